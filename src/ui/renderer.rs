//! Terminal rendering of the progress stream.

use indicatif::{ProgressBar, ProgressStyle};

use crate::progress::{ProgressEvent, ProgressSink};

use super::output::OutputMode;
use super::theme::Theme;

const BAR_TEMPLATE: &str = "{bar:30.magenta/dim} {pos}/{len} {msg}";

/// Renders progress events as a progress bar plus status lines.
///
/// The bar tracks `worked` against `total_work`, rising during fulfillment
/// and falling during rollback. Status lines are printed above the bar.
pub struct ConsoleRenderer {
    theme: Theme,
    mode: OutputMode,
    draw_bar: bool,
    bar: ProgressBar,
    current: Option<String>,
}

impl ConsoleRenderer {
    /// Create a renderer that draws a bar when stdout is a terminal.
    pub fn new(theme: Theme, mode: OutputMode) -> Self {
        let draw_bar = console::Term::stdout().is_term();
        Self {
            theme,
            mode,
            draw_bar,
            bar: ProgressBar::hidden(),
            current: None,
        }
    }

    /// Create a renderer that never draws a bar.
    pub fn without_bar(theme: Theme, mode: OutputMode) -> Self {
        Self {
            draw_bar: false,
            ..Self::new(theme, mode)
        }
    }

    /// Update bar state for `event` and return the status line to print, if any.
    pub fn render(&mut self, event: ProgressEvent<'_>) -> Option<String> {
        match event {
            ProgressEvent::Begin { total_work } => {
                self.bar = self.new_bar(total_work);
                self.current = None;
                None
            }
            ProgressEvent::StepBegin { name } => {
                self.current = Some(name.to_string());
                self.bar.set_message(name.to_string());
                self.mode
                    .shows_command_output()
                    .then(|| self.theme.format_step(name))
            }
            ProgressEvent::StepMessage { text } => {
                if self.mode.shows_command_output() {
                    return Some(format!("  {}", self.theme.dim.apply_to(text)));
                }
                let name = self.current.as_deref().unwrap_or_default();
                self.bar.set_message(format!("{}: {}", name, text));
                None
            }
            ProgressEvent::StepCompleted {
                worked,
                total_work,
                done,
            } => {
                self.bar.set_position(worked as u64);
                if done {
                    self.bar.finish_and_clear();
                }
                let name = self.current.take()?;
                self.mode
                    .shows_steps()
                    .then(|| self.theme.format_step_done(worked, total_work, &name))
            }
            ProgressEvent::StepFailed {
                requirement, cause, ..
            } => Some(
                self.theme
                    .format_error(&format!("{} failed: {:#}", requirement, cause)),
            ),
            ProgressEvent::RollbackBegin { label, .. } => {
                self.bar.set_message(label.to_string());
                self.mode
                    .shows_steps()
                    .then(|| self.theme.format_warning(label))
            }
            ProgressEvent::RollbackCompleted { worked, done, .. } => {
                self.bar.set_position(worked as u64);
                if done {
                    self.bar.finish_and_clear();
                }
                None
            }
        }
    }

    fn new_bar(&self, total_work: usize) -> ProgressBar {
        if !self.draw_bar {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total_work as u64);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

impl ProgressSink for ConsoleRenderer {
    fn emit(&mut self, event: ProgressEvent<'_>) {
        if let Some(line) = self.render(event) {
            self.bar.suspend(|| println!("{}", line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(mode: OutputMode) -> ConsoleRenderer {
        ConsoleRenderer::without_bar(Theme::plain(), mode)
    }

    fn render_all(renderer: &mut ConsoleRenderer, events: &[ProgressEvent<'_>]) -> Vec<String> {
        events.iter().filter_map(|e| renderer.render(*e)).collect()
    }

    #[test]
    fn normal_mode_prints_completed_steps() {
        let mut r = renderer(OutputMode::Normal);
        let lines = render_all(
            &mut r,
            &[
                ProgressEvent::Begin { total_work: 2 },
                ProgressEvent::StepBegin { name: "a" },
                ProgressEvent::StepMessage { text: "working" },
                ProgressEvent::StepCompleted {
                    worked: 1,
                    total_work: 2,
                    done: false,
                },
                ProgressEvent::StepBegin { name: "b" },
                ProgressEvent::StepCompleted {
                    worked: 2,
                    total_work: 2,
                    done: true,
                },
            ],
        );
        assert_eq!(lines, vec!["✓ [1/2] a", "✓ [2/2] b"]);
    }

    #[test]
    fn verbose_mode_shows_messages() {
        let mut r = renderer(OutputMode::Verbose);
        let lines = render_all(
            &mut r,
            &[
                ProgressEvent::Begin { total_work: 1 },
                ProgressEvent::StepBegin { name: "a" },
                ProgressEvent::StepMessage { text: "working" },
            ],
        );
        assert_eq!(lines, vec!["◆ a", "  working"]);
    }

    #[test]
    fn failure_and_rollback_lines() {
        let cause = anyhow::anyhow!("disk full");
        let mut r = renderer(OutputMode::Normal);
        let lines = render_all(
            &mut r,
            &[
                ProgressEvent::Begin { total_work: 2 },
                ProgressEvent::StepBegin { name: "b" },
                ProgressEvent::StepFailed {
                    requirement: "b",
                    completed_count: 1,
                    cause: &cause,
                },
                ProgressEvent::RollbackBegin {
                    requirement: "b",
                    label: "Rolling back \"b\"",
                },
                ProgressEvent::RollbackCompleted {
                    worked: 1,
                    total_work: 2,
                    done: false,
                },
            ],
        );
        assert_eq!(
            lines,
            vec!["✗ b failed: disk full", "⚠ Rolling back \"b\""]
        );
    }

    #[test]
    fn quiet_mode_hides_steps_but_not_failures() {
        let cause = anyhow::anyhow!("boom");
        let mut r = renderer(OutputMode::Quiet);
        let lines = render_all(
            &mut r,
            &[
                ProgressEvent::Begin { total_work: 1 },
                ProgressEvent::StepBegin { name: "a" },
                ProgressEvent::StepFailed {
                    requirement: "a",
                    completed_count: 0,
                    cause: &cause,
                },
                ProgressEvent::RollbackBegin {
                    requirement: "a",
                    label: "Rolling back \"a\"",
                },
            ],
        );
        assert_eq!(lines, vec!["✗ a failed: boom"]);
    }

    #[test]
    fn emit_without_terminal_does_not_panic() {
        let mut r = renderer(OutputMode::Quiet);
        r.emit(ProgressEvent::Begin { total_work: 1 });
        r.emit(ProgressEvent::StepBegin { name: "a" });
        r.emit(ProgressEvent::StepCompleted {
            worked: 1,
            total_work: 1,
            done: true,
        });
    }
}
