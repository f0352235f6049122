//! Styled terminal UI.

use console::Term;
use std::io::Write;

use super::progress::{format_duration, format_probe_line, shows_detail, shows_probe};
use super::{
    should_use_colors, NonInteractiveUI, OutputMode, ProgressSpinner, RunSummary, SpinnerHandle,
    StatusKind, Theme, UserInterface,
};
use crate::probes::ProbeResult;

/// Terminal UI with colors and spinners.
pub struct TerminalUI {
    term: Term,
    theme: Theme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            Theme::new()
        } else {
            Theme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(Term::stderr(), "{}", self.theme.format_error(msg)).ok();
    }

    fn data(&mut self, text: &str) {
        println!("{}", text);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_probe_result(&mut self, title: &str, result: &ProbeResult) {
        if !shows_probe(self.mode, result) {
            return;
        }
        let kind = StatusKind::from(result.status());
        writeln!(
            self.term,
            "{}",
            kind.format(&self.theme, &format_probe_line(title, result))
        )
        .ok();
        if shows_detail(self.mode, result) {
            writeln!(
                self.term,
                "   {}",
                self.theme.muted.apply_to(result.message())
            )
            .ok();
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        let b = &self.theme.border;

        writeln!(self.term).ok();
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("┌─"),
            b.apply_to("Summary ──────────────────────────")
        )
        .ok();
        writeln!(self.term, "  {} {}", b.apply_to("│"), summary.counts_line()).ok();
        writeln!(
            self.term,
            "  {} Total: {}",
            b.apply_to("│"),
            self.theme
                .duration
                .apply_to(format_duration(summary.total_duration)),
        )
        .ok();
        writeln!(
            self.term,
            "  {}",
            b.apply_to("├────────────────────────────────────")
        )
        .ok();
        let kind = StatusKind::from(summary.verdict);
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("│"),
            kind.format(&self.theme, summary.verdict.headline())
        )
        .ok();
        if summary.interrupted {
            writeln!(
                self.term,
                "  {} {}",
                b.apply_to("│"),
                StatusKind::Warning.format(&self.theme, "Run interrupted before all probes finished")
            )
            .ok();
        }
        writeln!(
            self.term,
            "  {}",
            b.apply_to("└────────────────────────────────────")
        )
        .ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && !crate::shell::is_ci() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Silent);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }
}
