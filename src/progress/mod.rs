//! Progress events and sinks.
//!
//! The engine reports everything it does as a linear sequence of
//! [`ProgressEvent`]s delivered synchronously to a caller-supplied
//! [`ProgressSink`]. Requirements add their own status text through a
//! [`StepReporter`], which writes into the same sink.
//!
//! Any `FnMut(ProgressEvent<'_>)` closure is a sink; [`Transcript`] records
//! an owned copy of every event.

pub mod record;

use std::fmt;

pub use record::{EventRecord, Transcript};

/// One entry in the progress stream of a resolution.
///
/// Events borrow from the engine for the duration of the `emit` call; use
/// [`ProgressEvent::to_record`] to keep one.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    /// Resolution started; `total_work` is the size of the dependency closure.
    Begin { total_work: usize },

    /// About to process one requirement.
    StepBegin { name: &'a str },

    /// Free-form status text from inside a requirement.
    StepMessage { text: &'a str },

    /// A step finished (applied or already satisfied).
    StepCompleted {
        worked: usize,
        total_work: usize,
        done: bool,
    },

    /// A step failed; rollback follows.
    StepFailed {
        requirement: &'a str,
        completed_count: usize,
        cause: &'a anyhow::Error,
    },

    /// About to compensate one requirement.
    RollbackBegin {
        requirement: &'a str,
        /// Display label, `Rolling back "<name>"`.
        label: &'a str,
    },

    /// A requirement was compensated; `worked` counts down to zero.
    RollbackCompleted {
        worked: usize,
        total_work: usize,
        done: bool,
    },
}

impl ProgressEvent<'_> {
    /// Convert to an owned record.
    pub fn to_record(&self) -> EventRecord {
        EventRecord::from(*self)
    }

    /// Whether this event ends the resolution.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::StepCompleted { done: true, .. }
                | ProgressEvent::RollbackCompleted { done: true, .. }
        )
    }
}

impl fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Begin { total_work } => write!(f, "begin ({} steps)", total_work),
            ProgressEvent::StepBegin { name } => write!(f, "step {}", name),
            ProgressEvent::StepMessage { text } => write!(f, "{}", text),
            ProgressEvent::StepCompleted {
                worked, total_work, ..
            } => write!(f, "completed {}/{}", worked, total_work),
            ProgressEvent::StepFailed {
                requirement,
                completed_count,
                cause,
            } => write!(
                f,
                "{} failed after {} completed: {:#}",
                requirement, completed_count, cause
            ),
            ProgressEvent::RollbackBegin { label, .. } => write!(f, "{}", label),
            ProgressEvent::RollbackCompleted {
                worked, total_work, ..
            } => write!(f, "rolled back to {}/{}", worked, total_work),
        }
    }
}

/// Consumer of the progress stream.
///
/// Called inline with the running operation, so implementations must not
/// block for long.
pub trait ProgressSink {
    /// Receive the next event.
    fn emit(&mut self, event: ProgressEvent<'_>);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent<'_>),
{
    fn emit(&mut self, event: ProgressEvent<'_>) {
        self(event)
    }
}

/// Handle given to requirements for reporting status text.
///
/// Only `StepMessage` events can be sent through it; the step bookkeeping
/// events belong to the engine.
pub struct StepReporter<'s> {
    sink: &'s mut dyn ProgressSink,
}

impl<'s> StepReporter<'s> {
    /// Wrap a sink.
    pub fn new(sink: &'s mut dyn ProgressSink) -> Self {
        Self { sink }
    }

    /// Emit a `StepMessage`.
    pub fn message(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        tracing::trace!(text, "step message");
        self.sink.emit(ProgressEvent::StepMessage { text });
    }
}

impl fmt::Debug for StepReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepReporter").finish_non_exhaustive()
    }
}
