//! Requirements backed by shell commands.
//!
//! Each operation maps to an optional shell command: `check` exiting 0
//! means the requirement is already satisfied, `apply` must exit 0, and
//! `compensate` undoes what `apply` did.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context as _};

use crate::config::{RequirementConfig, Settings};
use crate::progress::StepReporter;
use crate::shell::{execute_streaming, CommandOptions, CommandResult};

use super::Requirement;

/// Number of stderr lines quoted in an apply/compensate failure.
const STDERR_TAIL_LINES: usize = 5;

/// Which capability operation ran a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Check,
    Apply,
    Compensate,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Check => "check",
            Phase::Apply => "apply",
            Phase::Compensate => "compensate",
        };
        write!(f, "{}", s)
    }
}

/// One command that ran during a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// Requirement that ran the command.
    pub requirement: String,
    /// Operation the command belonged to.
    pub phase: Phase,
    /// The command line.
    pub command: String,
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    /// How long the command ran.
    pub duration: Duration,
}

/// Context shared by command requirements during one resolution.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Directory commands run in.
    pub working_dir: PathBuf,
    /// Environment applied to every command.
    pub env: HashMap<String, String>,
    history: Vec<CommandRecord>,
}

impl CommandContext {
    /// Create a context rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Add environment variables for every command.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Commands run so far, oldest first.
    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }
}

/// A requirement whose operations are shell commands.
#[derive(Debug, Clone)]
pub struct CommandRequirement {
    name: String,
    description: Option<String>,
    dependencies: Vec<String>,
    check: Option<String>,
    apply: String,
    compensate: Option<String>,
    env: HashMap<String, String>,
    timeout: Option<u64>,
    forward_output: bool,
}

impl CommandRequirement {
    /// Create a requirement that runs `apply`.
    pub fn new(name: impl Into<String>, apply: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            dependencies: Vec::new(),
            check: None,
            apply: apply.into(),
            compensate: None,
            env: HashMap::new(),
            timeout: None,
            forward_output: false,
        }
    }

    /// Build from a config entry and the global settings.
    pub fn from_config(config: &RequirementConfig, settings: &Settings) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            dependencies: config.depends_on.clone(),
            check: config.check.clone(),
            apply: config.apply.clone(),
            compensate: config.compensate.clone(),
            env: config.env.clone(),
            timeout: config.timeout.or(settings.timeout),
            forward_output: settings.forward_output,
        }
    }

    /// Set the check command.
    pub fn with_check(mut self, command: impl Into<String>) -> Self {
        self.check = Some(command.into());
        self
    }

    /// Set the compensate command.
    pub fn with_compensate(mut self, command: impl Into<String>) -> Self {
        self.compensate = Some(command.into());
        self
    }

    /// Append prerequisite names.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Set a per-command timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Forward command output lines as step messages.
    pub fn forward_output(mut self, forward: bool) -> Self {
        self.forward_output = forward;
        self
    }

    /// Human-readable description, if configured.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn run(
        &self,
        phase: Phase,
        command: &str,
        ctx: &mut CommandContext,
        progress: &mut StepReporter<'_>,
    ) -> anyhow::Result<CommandResult> {
        let mut env = ctx.env.clone();
        env.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));

        let options = CommandOptions {
            cwd: Some(ctx.working_dir.clone()),
            env,
            timeout: self.timeout,
        };

        tracing::debug!(requirement = %self.name, %phase, command, "Running command");
        let forward = self.forward_output;
        let result = execute_streaming(command, &options, &mut |line| {
            if forward {
                progress.message(line.text());
            }
        })
        .with_context(|| format!("{} command for '{}' did not complete", phase, self.name))?;

        ctx.history.push(CommandRecord {
            requirement: self.name.clone(),
            phase,
            command: command.to_string(),
            exit_code: result.exit_code,
            duration: result.duration,
        });

        Ok(result)
    }

    fn ensure_success(&self, command: &str, result: &CommandResult) -> anyhow::Result<()> {
        if result.success {
            return Ok(());
        }
        let code = result
            .exit_code
            .map_or_else(|| "a signal".to_string(), |c| format!("code {}", c));
        let tail = result.stderr_tail(STDERR_TAIL_LINES);
        if tail.is_empty() {
            bail!("`{}` exited with {}", command, code);
        }
        bail!("`{}` exited with {}: {}", command, code, tail)
    }
}

impl Requirement<CommandContext> for CommandRequirement {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(
        &self,
        ctx: &mut CommandContext,
        progress: &mut StepReporter<'_>,
    ) -> anyhow::Result<bool> {
        progress.message(format!("checking {}", self.name));
        match &self.check {
            Some(command) => Ok(self.run(Phase::Check, command, ctx, progress)?.success),
            None => Ok(false),
        }
    }

    fn apply(
        &self,
        ctx: &mut CommandContext,
        progress: &mut StepReporter<'_>,
    ) -> anyhow::Result<()> {
        progress.message(format!("fulfilling {}", self.name));
        let result = self.run(Phase::Apply, &self.apply, ctx, progress)?;
        self.ensure_success(&self.apply, &result)
    }

    fn compensate(
        &self,
        ctx: &mut CommandContext,
        progress: &mut StepReporter<'_>,
    ) -> anyhow::Result<()> {
        let Some(command) = &self.compensate else {
            progress.message(format!("nothing to compensate for {}", self.name));
            return Ok(());
        };
        progress.message(format!("compensating {}", self.name));
        let result = self.run(Phase::Compensate, command, ctx, progress)?;
        self.ensure_success(command, &result)
    }
}
