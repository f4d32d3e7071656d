//! Configuration loading, parsing, and validation for Requisite.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use requisite::config::{build_requirement_set, load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("requisite.yml"),
//!     "requirements:\n  - name: hello\n    apply: echo hello\n",
//! )
//! .unwrap();
//!
//! let (_, config) = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! let set = build_requirement_set(&config).unwrap();
//! assert!(set.contains("hello"));
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{discover_config, load_config, load_config_file, parse_config, CONFIG_CANDIDATES};
pub use schema::{RequirementConfig, RequisiteConfig, Settings};
pub use validator::{validate, validate_config, ValidationError};

use crate::error::Result;
use crate::requirements::{CommandContext, CommandRequirement, RequirementSet};

/// Build a requirement set from a validated configuration.
///
/// Runs shape validation first, then checks the dependency graph for
/// unknown names and cycles.
pub fn build_requirement_set(config: &RequisiteConfig) -> Result<RequirementSet<CommandContext>> {
    validate(config)?;

    let mut set = RequirementSet::new();
    for requirement in &config.requirements {
        set.add_requirement(CommandRequirement::from_config(requirement, &config.settings));
    }
    set.validate()?;

    tracing::debug!(count = set.len(), "Built requirement set");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequisiteError;
    use std::path::Path;

    fn parse(yaml: &str) -> RequisiteConfig {
        parse_config(yaml, Path::new("requisite.yml")).unwrap()
    }

    #[test]
    fn builds_set_in_file_order() {
        let config = parse(
            r#"
requirements:
  - name: b
    apply: "true"
  - name: a
    apply: "true"
    depends_on: [b]
"#,
        );
        let set = build_requirement_set(&config).unwrap();
        assert_eq!(set.requirement_ids(), vec!["b", "a"]);
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let config = parse(
            r#"
requirements:
  - name: a
    apply: "true"
    depends_on: [ghost]
"#,
        );
        let err = build_requirement_set(&config).unwrap_err();
        assert!(matches!(err, RequisiteError::UnknownRequirement { .. }));
    }

    #[test]
    fn cycle_is_rejected() {
        let config = parse(
            r#"
requirements:
  - name: a
    apply: "true"
    depends_on: [b]
  - name: b
    apply: "true"
    depends_on: [a]
"#,
        );
        let err = build_requirement_set(&config).unwrap_err();
        assert!(matches!(err, RequisiteError::CircularDependency { .. }));
    }

    #[test]
    fn shape_errors_come_first() {
        let config = parse(
            r#"
requirements:
  - name: a
    apply: ""
"#,
        );
        let err = build_requirement_set(&config).unwrap_err();
        assert!(matches!(err, RequisiteError::ConfigValidationError { .. }));
    }
}
