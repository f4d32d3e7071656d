//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal usage and [`MockUI`] for tests
//! - [`ConsoleRenderer`] and [`JsonLinesRenderer`] progress sinks

pub mod json;
pub mod mock;
pub mod output;
pub mod renderer;
pub mod terminal;
pub mod theme;

pub use json::JsonLinesRenderer;
pub use mock::MockUI;
pub use output::OutputMode;
pub use renderer::ConsoleRenderer;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, Theme};

use crate::progress::ProgressSink;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Sink that renders fulfillment progress.
    fn progress_sink(&mut self) -> &mut dyn ProgressSink;
}
