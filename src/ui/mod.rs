//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait so the orchestrator never writes to stdout directly
//! - [`TerminalUI`] for styled terminal usage
//! - [`NonInteractiveUI`] for CI logs and pipes
//! - [`MockUI`] capturing everything for tests
//!
//! # Example
//!
//! ```
//! use cacheprobe::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Silent);
//! ui.show_header("Cache probe");
//! ui.success("Done");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_duration, format_probe_line};
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use std::time::Duration;

use crate::probes::ProbeResult;
use crate::runner::{StatusCounts, Verdict};

/// Trait for user-facing output.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Write machine-readable output to stdout in every mode.
    fn data(&mut self, text: &str);

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the progress line for a finished probe.
    fn show_probe_result(&mut self, title: &str, result: &ProbeResult);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Stop and remove the spinner line.
    fn finish_and_clear(&mut self);
}

/// End-of-run totals handed to [`UserInterface::show_run_summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub counts: StatusCounts,
    pub verdict: Verdict,
    pub total_duration: Duration,
    pub interrupted: bool,
}

impl RunSummary {
    /// `"N passed, N warnings, N failed, N skipped"`.
    pub fn counts_line(&self) -> String {
        format!(
            "{} passed, {} warnings, {} failed, {} skipped",
            self.counts.passed, self.counts.warnings, self.counts.failed, self.counts.skipped
        )
    }
}
