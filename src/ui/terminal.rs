//! Terminal UI.

use console::Term;
use std::io::Write;

use crate::progress::ProgressSink;

use super::{ConsoleRenderer, OutputMode, Theme, UserInterface};

/// Terminal UI writing status to stdout and errors to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: Theme,
    renderer: ConsoleRenderer,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = Theme::detect();
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            renderer: ConsoleRenderer::new(theme.clone(), mode),
            theme,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn progress_sink(&mut self) -> &mut dyn ProgressSink {
        &mut self.renderer
    }
}
