//! Probe outcome records.
//!
//! Every probe produces exactly one [`ProbeResult`]. Results are immutable
//! once built: fields are private and only readable through accessors.

use std::cmp::Ordering;
use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Outcome classification shared by all probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The capability under test is fully functional.
    Passed,
    /// Degraded, non-critical, or expected to recover in CI.
    Warning,
    /// Broken in a way that would also break CI.
    Failed,
    /// Prerequisite artifact absent; the check did not run.
    Skipped,
}

impl ProbeStatus {
    /// All statuses, most severe first.
    pub const BY_SEVERITY: [ProbeStatus; 4] = [
        ProbeStatus::Failed,
        ProbeStatus::Warning,
        ProbeStatus::Skipped,
        ProbeStatus::Passed,
    ];

    /// Reporting severity: failed > warning > skipped > passed.
    pub fn severity(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Skipped => 1,
            Self::Warning => 2,
            Self::Failed => 3,
        }
    }

    /// Lowercase name as used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Warning => "warning",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl PartialOrd for ProbeStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProbeStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform outcome of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    name: String,
    status: ProbeStatus,
    #[serde(serialize_with = "serialize_secs")]
    duration: Duration,
    message: String,
    timestamp: DateTime<Utc>,
}

impl ProbeResult {
    /// Build a result stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        status: ProbeStatus,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            duration,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Probe identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outcome classification.
    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    /// Elapsed wall-clock time of the probe.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Human-readable detail; may be empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the result was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Measures a probe body and stamps its result.
///
/// ```
/// use cacheprobe::probes::{ProbeStatus, ProbeTimer};
///
/// let timer = ProbeTimer::start("python_environment");
/// let result = timer.passed("Python 3.11.4 ready");
/// assert_eq!(result.status(), ProbeStatus::Passed);
/// assert_eq!(result.name(), "python_environment");
/// ```
#[derive(Debug)]
pub struct ProbeTimer {
    name: String,
    start: Instant,
}

impl ProbeTimer {
    /// Start timing the named probe.
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finish with the given status.
    pub fn finish(self, status: ProbeStatus, message: impl Into<String>) -> ProbeResult {
        let elapsed = self.start.elapsed();
        ProbeResult::new(self.name, status, elapsed, message)
    }

    /// Finish as passed.
    pub fn passed(self, message: impl Into<String>) -> ProbeResult {
        self.finish(ProbeStatus::Passed, message)
    }

    /// Finish as warning.
    pub fn warning(self, message: impl Into<String>) -> ProbeResult {
        self.finish(ProbeStatus::Warning, message)
    }

    /// Finish as failed.
    pub fn failed(self, message: impl Into<String>) -> ProbeResult {
        self.finish(ProbeStatus::Failed, message)
    }

    /// Finish as skipped.
    pub fn skipped(self, message: impl Into<String>) -> ProbeResult {
        self.finish(ProbeStatus::Skipped, message)
    }
}

/// Truncate text to at most `max` characters, on a char boundary.
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
