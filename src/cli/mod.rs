//! Command-line interface for Requisite.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ListArgs, PlanArgs, RunArgs};
pub use commands::{
    Command, CommandDispatcher, CommandResult, EXIT_CONFIG_ERROR, EXIT_ROLLED_BACK,
};
