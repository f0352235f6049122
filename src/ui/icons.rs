//! Status vocabulary for consistent CLI output.
//!
//! `StatusKind` is the single set of icons and labels used for probe
//! lines, the summary, and the `list` command.

use super::theme::Theme;
use crate::probes::ProbeStatus;
use crate::runner::Verdict;

/// Canonical status kinds used across all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Check passed.
    Success,
    /// Check failed.
    Failed,
    /// Check did not run.
    Skipped,
    /// Check is currently running.
    Running,
    /// Non-fatal warning.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Running => "◆",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Running => "[run]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &Theme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.muted.apply_to(icon).to_string(),
            Self::Running => theme.running.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &Theme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<ProbeStatus> for StatusKind {
    fn from(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Passed => Self::Success,
            ProbeStatus::Warning => Self::Warning,
            ProbeStatus::Failed => Self::Failed,
            ProbeStatus::Skipped => Self::Skipped,
        }
    }
}

impl From<Verdict> for StatusKind {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Ready => Self::Success,
            Verdict::NeedsReview => Self::Warning,
            Verdict::BlockingIssues => Self::Failed,
        }
    }
}
