//! Error types for requisite operations.
//!
//! This module defines [`RequisiteError`], the primary error type used
//! throughout the crate, [`RequirementError`], the value describing a single
//! failed step, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems (unknown names, cycles, bad config files) are
//!   detected before anything runs and surface as `RequisiteError`
//! - A failing `check`/`apply` becomes a [`RequirementError`] and triggers
//!   rollback; it is reported in-band rather than as an `Err`
//! - Capability operations return `anyhow::Result` so requirement authors
//!   can attach context freely; the engine never rewrites that error

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for requisite operations.
#[derive(Debug, Error)]
pub enum RequisiteError {
    /// A requirement name (target or dependency) is not registered.
    #[error(
        "Unknown requirement '{name}'{}",
        .required_by
            .as_ref()
            .map(|by| format!(" (required by '{}')", by))
            .unwrap_or_default()
    )]
    UnknownRequirement {
        name: String,
        required_by: Option<String>,
    },

    /// Requirement dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// A step failed and every applied step was rolled back.
    #[error(transparent)]
    RequirementFailed(#[from] RequirementError),

    /// Compensating a requirement failed; rollback stopped at that point.
    #[error("Rollback stopped: compensating '{requirement}' failed: {source:#}")]
    CompensationFailed {
        /// The requirement whose compensation failed.
        requirement: String,
        /// Requirements that were still queued for compensation.
        pending: Vec<String>,
        /// The compensation error.
        source: anyhow::Error,
        /// The step failure that triggered the rollback.
        failure: Box<RequirementError>,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command could not be started or waited on.
    #[error("Could not run command '{command}': {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Shell command exceeded its timeout and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RequisiteError {
    /// Whether this error was raised before any step ran.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RequisiteError::UnknownRequirement { .. }
                | RequisiteError::CircularDependency { .. }
                | RequisiteError::ConfigNotFound { .. }
                | RequisiteError::ConfigParseError { .. }
                | RequisiteError::ConfigValidationError { .. }
        )
    }
}

/// A failed `check` or `apply` of one requirement.
///
/// Carries the original cause unmodified so callers can downcast it.
#[derive(Debug, Error)]
#[error("Requirement '{requirement}' failed after {completed_count} completed step(s): {cause:#}")]
pub struct RequirementError {
    requirement: String,
    completed_count: usize,
    #[source]
    cause: anyhow::Error,
}

impl RequirementError {
    /// Create a new requirement error.
    pub fn new(requirement: impl Into<String>, completed_count: usize, cause: anyhow::Error) -> Self {
        Self {
            requirement: requirement.into(),
            completed_count,
            cause,
        }
    }

    /// Name of the requirement that failed.
    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    /// Number of steps that had fully succeeded before the failure.
    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    /// The error returned by the requirement.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Consume the error, returning the underlying cause.
    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

/// Result type alias for requisite operations.
pub type Result<T> = std::result::Result<T, RequisiteError>;
