//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`].

pub mod dispatcher;
pub mod lint;
pub mod list;
pub mod plan;
pub mod run;

pub use dispatcher::{
    Command, CommandDispatcher, CommandResult, EXIT_CONFIG_ERROR, EXIT_ROLLED_BACK,
};

use std::path::{Path, PathBuf};

use crate::config::{build_requirement_set, load_config, RequisiteConfig};
use crate::error::Result;
use crate::requirements::{CommandContext, RequirementSet};

/// A loaded and validated project configuration.
pub(crate) struct Project {
    pub path: PathBuf,
    pub config: RequisiteConfig,
    pub set: RequirementSet<CommandContext>,
}

impl Project {
    /// Load, validate, and build the requirement set for a project.
    pub(crate) fn load(project_root: &Path, config: Option<&Path>) -> Result<Self> {
        let (path, config) = load_config(project_root, config)?;
        let set = build_requirement_set(&config)?;
        Ok(Self { path, config, set })
    }
}
