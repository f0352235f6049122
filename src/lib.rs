//! Cacheprobe - Local CI readiness checks.
//!
//! Cacheprobe runs a fixed sequence of probes against a project before it is
//! pushed to CI: the interpreter and pip, the pip cache, dependency
//! manifests, imports, demo tooling, the project CLI, Node.js detection and a
//! simulated GitHub Actions environment. Results are summarized into a
//! verdict and persisted as a JSON report.
//!
//! # Modules
//!
//! - [`cache`] - Cache directory sizing and inventory
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Harness configuration and `.cacheprobe.yml` overrides
//! - [`error`] - Error types and result aliases
//! - [`probes`] - The probe trait and the built-in probes
//! - [`report`] - Report assembly and persistence
//! - [`runner`] - Sequential probe orchestration and verdicts
//! - [`shell`] - External process execution with timeouts
//! - [`ui`] - Spinners, progress lines and terminal output
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use cacheprobe::probes::{ProbeResult, ProbeStatus};
//! use cacheprobe::runner::{StatusCounts, Verdict};
//!
//! let results = vec![
//!     ProbeResult::new("python_environment", ProbeStatus::Passed, Duration::from_millis(40), "Python 3.11.4 ready"),
//!     ProbeResult::new("nodejs_detection", ProbeStatus::Warning, Duration::from_millis(3), "Node.js not installed"),
//! ];
//! let counts = StatusCounts::tally(&results);
//! assert_eq!(counts.warnings, 1);
//! assert_eq!(Verdict::from_counts(&counts), Verdict::Ready);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod probes;
pub mod report;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{CacheProbeError, Result};
