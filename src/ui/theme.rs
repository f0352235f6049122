//! Colors for the terminal UI.

use console::Style;

/// Styles applied by [`TerminalUI`](super::TerminalUI) and [`StatusKind`](super::StatusKind).
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Probe currently executing.
    pub running: Style,
    /// Skipped probes and detail messages.
    pub muted: Style,
    pub header: Style,
    pub duration: Style,
    /// Summary box lines.
    pub border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// The colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            running: Style::new().cyan(),
            muted: Style::new().dim(),
            header: Style::new().bold().cyan(),
            duration: Style::new().dim(),
            border: Style::new().dim(),
        }
    }

    /// Every style unset, for `--no-color` and dumb terminals.
    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            success: none.clone(),
            warning: none.clone(),
            error: none.clone(),
            running: none.clone(),
            muted: none.clone(),
            header: none.clone(),
            duration: none.clone(),
            border: none,
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(format!("✓ {}", msg)).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(format!("⚠ {}", msg)).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(format!("✗ {}", msg)).to_string()
    }

    /// Run banner: `▸ title`.
    pub fn format_header(&self, title: &str) -> String {
        self.header.apply_to(format!("▸ {}", title)).to_string()
    }
}

/// Whether styled output should be produced on stdout.
///
/// Honors `NO_COLOR` and `--no-color` (which disables console's colors).
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && console::colors_enabled()
        && console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_keeps_icons() {
        let theme = Theme::plain();
        assert_eq!(theme.format_success("pip cache ready"), "✓ pip cache ready");
        assert_eq!(theme.format_warning("no Node.js"), "⚠ no Node.js");
        assert_eq!(theme.format_error("pip broken"), "✗ pip broken");
    }

    #[test]
    fn header_has_marker() {
        assert_eq!(Theme::plain().format_header("Cache probe"), "▸ Cache probe");
    }

    #[test]
    fn colored_theme_keeps_text() {
        assert!(Theme::new().format_error("boom").contains("boom"));
    }
}
