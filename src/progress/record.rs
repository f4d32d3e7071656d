//! Owned, serializable progress records.

use serde::{Deserialize, Serialize};

use super::{ProgressEvent, ProgressSink};

/// Owned mirror of [`ProgressEvent`].
///
/// The failure cause is rendered to text (including its context chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventRecord {
    Begin {
        total_work: usize,
    },
    StepBegin {
        name: String,
    },
    StepMessage {
        text: String,
    },
    StepCompleted {
        worked: usize,
        total_work: usize,
        done: bool,
    },
    StepFailed {
        requirement: String,
        completed_count: usize,
        cause: String,
    },
    RollbackBegin {
        requirement: String,
        label: String,
    },
    RollbackCompleted {
        worked: usize,
        total_work: usize,
        done: bool,
    },
}

impl From<ProgressEvent<'_>> for EventRecord {
    fn from(event: ProgressEvent<'_>) -> Self {
        match event {
            ProgressEvent::Begin { total_work } => EventRecord::Begin { total_work },
            ProgressEvent::StepBegin { name } => EventRecord::StepBegin {
                name: name.to_string(),
            },
            ProgressEvent::StepMessage { text } => EventRecord::StepMessage {
                text: text.to_string(),
            },
            ProgressEvent::StepCompleted {
                worked,
                total_work,
                done,
            } => EventRecord::StepCompleted {
                worked,
                total_work,
                done,
            },
            ProgressEvent::StepFailed {
                requirement,
                completed_count,
                cause,
            } => EventRecord::StepFailed {
                requirement: requirement.to_string(),
                completed_count,
                cause: format!("{:#}", cause),
            },
            ProgressEvent::RollbackBegin { requirement, label } => EventRecord::RollbackBegin {
                requirement: requirement.to_string(),
                label: label.to_string(),
            },
            ProgressEvent::RollbackCompleted {
                worked,
                total_work,
                done,
            } => EventRecord::RollbackCompleted {
                worked,
                total_work,
                done,
            },
        }
    }
}

/// A sink that records every event it receives.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    events: Vec<EventRecord>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Consume the transcript, returning the recorded events.
    pub fn into_events(self) -> Vec<EventRecord> {
        self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The text of every `StepMessage`, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            EventRecord::StepMessage { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// The most recent event.
    pub fn last(&self) -> Option<&EventRecord> {
        self.events.last()
    }
}

impl ProgressSink for Transcript {
    fn emit(&mut self, event: ProgressEvent<'_>) {
        self.events.push(event.into());
    }
}
