//! Configuration validation rules.
//!
//! This module validates the shape of a config file:
//! - Requirement names must be non-empty, unpadded and unique
//! - Every requirement must have an `apply` command
//! - A requirement may not depend on itself
//!
//! Unknown dependencies and cycles are graph properties and are reported
//! by [`RequirementSet::validate`](crate::requirements::RequirementSet::validate).

use crate::config::schema::RequisiteConfig;
use crate::error::{RequisiteError, Result};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Requirement name if error is requirement-specific
    pub requirement: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &RequisiteConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (position, requirement) in config.requirements.iter().enumerate() {
        let name = requirement.name.trim();

        if name.is_empty() {
            errors.push(ValidationError {
                rule: "missing-name".to_string(),
                message: format!("Requirement #{} has no name", position + 1),
                requirement: None,
            });
            continue;
        }

        if name != requirement.name {
            errors.push(ValidationError {
                rule: "padded-name".to_string(),
                message: format!(
                    "Requirement '{}' has leading or trailing whitespace in its name",
                    requirement.name
                ),
                requirement: Some(requirement.name.clone()),
            });
            continue;
        }

        if !seen.insert(name) {
            errors.push(ValidationError {
                rule: "duplicate-name".to_string(),
                message: format!("Requirement '{}' is defined more than once", name),
                requirement: Some(name.to_string()),
            });
        }

        if requirement.apply.trim().is_empty() {
            errors.push(ValidationError {
                rule: "missing-apply".to_string(),
                message: format!("Requirement '{}' must have an 'apply' command", name),
                requirement: Some(name.to_string()),
            });
        }

        if requirement.depends_on.iter().any(|dep| dep == name) {
            errors.push(ValidationError {
                rule: "self-dependency".to_string(),
                message: format!("Requirement '{}' depends on itself", name),
                requirement: Some(name.to_string()),
            });
        }
    }

    errors
}

/// Validate a configuration, failing on the first batch of errors.
///
/// # Errors
///
/// Returns `ConfigValidationError` with every message joined by `; `.
pub fn validate(config: &RequisiteConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(RequisiteError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
