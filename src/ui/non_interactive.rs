//! Plain UI for CI logs and pipes.

use super::progress::{format_duration, format_probe_line, shows_detail, shows_probe};
use super::{OutputMode, RunSummary, SpinnerHandle, StatusKind, UserInterface};
use crate::probes::ProbeResult;

/// UI implementation for non-interactive mode.
///
/// Statuses use bracketed labels instead of icons so logs stay greppable.
/// No spinners are drawn.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn data(&mut self, text: &str) {
        println!("{}", text);
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_probe_result(&mut self, title: &str, result: &ProbeResult) {
        if !shows_probe(self.mode, result) {
            return;
        }
        let kind = StatusKind::from(result.status());
        println!("{}", kind.format_plain(&format_probe_line(title, result)));
        if shows_detail(self.mode, result) {
            println!("   {}", result.message());
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");
        println!("  │ {}", summary.counts_line());
        println!("  │ Total: {}", format_duration(summary.total_duration));
        println!("  ├────────────────────────────────────");
        let kind = StatusKind::from(summary.verdict);
        println!("  │ {}", kind.format_plain(summary.verdict.headline()));
        if summary.interrupted {
            println!(
                "  │ {}",
                StatusKind::Warning.format_plain("Run interrupted before all probes finished")
            );
        }
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that does nothing (for non-interactive mode).
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_and_clear(&mut self) {}
}
