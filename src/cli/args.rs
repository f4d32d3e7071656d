//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Requisite - fulfill requirements in dependency order, rolling back on failure.
#[derive(Debug, Parser)]
#[command(name = "requisite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides requisite.yml discovery)
    #[arg(short, long, global = true, env = "REQUISITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fulfill a requirement and everything it depends on
    Run(RunArgs),

    /// Show the order a requirement would be fulfilled in
    Plan(PlanArgs),

    /// List registered requirements
    List(ListArgs),

    /// Validate the configuration and dependency graph
    Lint,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Requirement to fulfill
    pub target: String,

    /// Emit progress events as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Requirement to plan
    pub target: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_globals() {
        let cli = Cli::try_parse_from(["requisite", "-q", "run", "build", "--json"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.target, "build");
                assert!(args.json);
            }
            other => panic!("Expected run, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["requisite", "plan", "build", "--config", "custom.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yml")));
    }

    #[test]
    fn run_requires_target() {
        assert!(Cli::try_parse_from(["requisite", "run"]).is_err());
    }
}
