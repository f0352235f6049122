//! Status tallies and the overall readiness verdict.

use serde::Serialize;

use crate::probes::{ProbeResult, ProbeStatus};

/// Number of results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub passed: usize,
    #[serde(rename = "warning")]
    pub warnings: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl StatusCounts {
    /// Tally a sequence of results.
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a ProbeResult>) -> Self {
        let mut counts = Self::default();
        for result in results {
            counts.record(result.status());
        }
        counts
    }

    /// Count one more result.
    pub fn record(&mut self, status: ProbeStatus) {
        match status {
            ProbeStatus::Passed => self.passed += 1,
            ProbeStatus::Warning => self.warnings += 1,
            ProbeStatus::Failed => self.failed += 1,
            ProbeStatus::Skipped => self.skipped += 1,
        }
        self.total += 1;
    }
}

/// Overall readiness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No failures.
    Ready,
    /// One or two failures alongside at least one warning.
    NeedsReview,
    /// Anything worse.
    BlockingIssues,
}

impl Verdict {
    /// Classify a tally.
    ///
    /// A small number of failures only downgrades to review when warnings
    /// suggest a flaky environment rather than a broken one.
    pub fn from_counts(counts: &StatusCounts) -> Self {
        match (counts.failed, counts.warnings) {
            (0, _) => Self::Ready,
            (1..=2, w) if w > 0 => Self::NeedsReview,
            _ => Self::BlockingIssues,
        }
    }

    /// Summary line shown at the end of a run.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Ready => "All critical probes passed - ready for CI",
            Self::NeedsReview => "Some issues detected - review before CI deployment",
            Self::BlockingIssues => "Multiple failures detected - fix issues before deploying",
        }
    }
}
