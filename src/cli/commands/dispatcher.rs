//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Exit code for a resolution that failed and was rolled back.
pub const EXIT_ROLLED_BACK: i32 = 1;

/// Exit code for configuration errors and failed compensation.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Errors are reported by the caller and map to [`EXIT_CONFIG_ERROR`].
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config: None,
        }
    }

    /// Use an explicit config file instead of discovery.
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config = config;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.config.as_deref();
        match &cli.command {
            Commands::Run(args) => {
                super::run::RunCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Commands::Plan(args) => {
                super::plan::PlanCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(&self.project_root, config, args.clone()).execute(ui)
            }
            Commands::Lint => super::lint::LintCommand::new(&self.project_root, config).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_constructors() {
        assert_eq!(
            CommandResult::success(),
            CommandResult {
                success: true,
                exit_code: 0
            }
        );
        let failed = CommandResult::failure(EXIT_ROLLED_BACK);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 1);
    }

    #[test]
    fn dispatcher_keeps_project_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/tmp/project"));
        assert_eq!(dispatcher.project_root(), Path::new("/tmp/project"));
    }
}
