//! Requisite - fulfill named requirements in dependency order, with
//! compensating rollback on failure.
//!
//! Requirements are registered into a [`RequirementSet`]. Asking the set to
//! fulfill one requirement runs its whole dependency closure, dependencies
//! first. If any step fails, every step that already ran is compensated in
//! reverse order, and the caller receives the failing step's error.
//! Progress is reported as a linear stream of events to a caller-supplied
//! sink.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - YAML configuration for command-backed requirements
//! - [`error`] - Error types and result aliases
//! - [`progress`] - Progress events and sinks
//! - [`requirements`] - The requirement contract, registry, and closure
//! - [`runner`] - Fulfillment and rollback
//! - [`shell`] - Shell command execution
//! - [`ui`] - Terminal and JSON rendering
//!
//! # Example
//!
//! ```
//! use requisite::progress::{EventRecord, Transcript};
//! use requisite::requirements::{FnRequirement, RequirementSet};
//!
//! let mut set = RequirementSet::<Vec<String>>::new();
//! set.add_requirement(FnRequirement::<Vec<String>>::new("database", |log, _| {
//!     log.push("database".to_string());
//!     Ok(())
//! }));
//! set.add_requirement(
//!     FnRequirement::<Vec<String>>::new("migrate", |log, _| {
//!         log.push("migrate".to_string());
//!         Ok(())
//!     })
//!     .depends_on(["database"]),
//! );
//!
//! let mut log = Vec::new();
//! let mut transcript = Transcript::new();
//! let outcome = set.fulfill_requirement("migrate", &mut log, &mut transcript).unwrap();
//!
//! assert!(outcome.is_completed());
//! assert_eq!(log, ["database", "migrate"]);
//! assert_eq!(transcript.events()[0], EventRecord::Begin { total_work: 2 });
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{RequirementError, RequisiteError, Result};
pub use progress::{ProgressEvent, ProgressSink, StepReporter};
pub use requirements::{Requirement, RequirementSet};
pub use runner::{FulfillSummary, Fulfillment};
