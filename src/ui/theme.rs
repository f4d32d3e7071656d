//! Visual theme and styling.

use console::Style;

/// Requisite's visual theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning and rollback messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for requirement names (bold).
    pub step_title: Style,
    /// Style for step counters like `[2/5]` (dim).
    pub step_number: Style,
    /// Style for commands shown in output (dim italic).
    pub command: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            step_title: Style::new().bold(),
            step_number: Style::new().dim(),
            command: Style::new().dim().italic(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            step_title: Style::new(),
            step_number: Style::new(),
            command: Style::new(),
        }
    }

    /// Pick [`Theme::new`] or [`Theme::plain`] for the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a requirement heading, e.g. `◆ toolchain`.
    pub fn format_step(&self, name: &str) -> String {
        format!("{}", self.step_title.apply_to(format!("◆ {}", name)))
    }

    /// Format a completed step with its counter, e.g. `✓ [2/5] build`.
    pub fn format_step_done(&self, worked: usize, total_work: usize, name: &str) -> String {
        format!(
            "{} {} {}",
            self.success.apply_to("✓"),
            self.step_number.apply_to(format!("[{}/{}]", worked, total_work)),
            name
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term() && console::colors_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let msg = Theme::plain().format_success("Complete");
        assert_eq!(msg, "✓ Complete");
    }

    #[test]
    fn theme_formats_warning() {
        let msg = Theme::plain().format_warning("Rolling back \"db\"");
        assert_eq!(msg, "⚠ Rolling back \"db\"");
    }

    #[test]
    fn theme_formats_error() {
        let msg = Theme::plain().format_error("Failed");
        assert!(msg.contains("✗"));
        assert!(msg.contains("Failed"));
    }

    #[test]
    fn theme_formats_step() {
        assert_eq!(Theme::plain().format_step("database"), "◆ database");
    }

    #[test]
    fn theme_formats_step_done() {
        assert_eq!(
            Theme::plain().format_step_done(2, 5, "build"),
            "✓ [2/5] build"
        );
    }

    #[test]
    fn default_impl_matches_new() {
        assert_eq!(
            Theme::default().format_success("test"),
            Theme::new().format_success("test")
        );
    }
}
