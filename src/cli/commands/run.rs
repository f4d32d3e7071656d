//! Run command implementation.
//!
//! The `requisite run <target>` command fulfills a requirement and its
//! dependencies, rolling back on failure.

use std::io;
use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::requirements::CommandContext;
use crate::runner::Fulfillment;
use crate::ui::{JsonLinesRenderer, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_ROLLED_BACK};
use super::Project;

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = Project::load(&self.project_root, self.config.as_deref())?;
        let mut ctx = CommandContext::new(&self.project_root)
            .with_env(project.config.settings.env.clone());
        let target = self.args.target.as_str();

        if self.args.json {
            let mut renderer = JsonLinesRenderer::new(io::stdout().lock());
            let outcome = project
                .set
                .fulfill_requirement(target, &mut ctx, &mut renderer)?;
            let _stdout = renderer.finish()?;
            return Ok(exit_for(&outcome));
        }

        let outcome = project
            .set
            .fulfill_requirement(target, &mut ctx, ui.progress_sink())?;

        match &outcome {
            Fulfillment::Completed(summary) => {
                let mut msg = format!("Fulfilled '{}'", summary.target);
                if !summary.already_satisfied.is_empty() {
                    msg.push_str(&format!(
                        " ({} already satisfied)",
                        summary.already_satisfied.len()
                    ));
                }
                ui.success(&msg);
            }
            Fulfillment::RolledBack(failure) => {
                ui.error(&format!(
                    "Could not fulfill '{}': '{}' failed, rolled back {} completed requirement(s)",
                    target,
                    failure.requirement(),
                    failure.completed_count()
                ));
            }
        }

        Ok(exit_for(&outcome))
    }
}

fn exit_for(outcome: &Fulfillment) -> CommandResult {
    if outcome.is_completed() {
        CommandResult::success()
    } else {
        CommandResult::failure(EXIT_ROLLED_BACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequisiteError;
    use crate::progress::EventRecord;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requisite.yml"), config).unwrap();
        temp
    }

    fn run(temp: &TempDir, target: &str, ui: &mut MockUI) -> Result<CommandResult> {
        let args = RunArgs {
            target: target.to_string(),
            json: false,
        };
        RunCommand::new(temp.path(), None, args).execute(ui)
    }

    #[test]
    fn run_completes_chain() {
        let temp = setup_project(
            r#"
requirements:
  - name: a
    apply: exit 0
  - name: b
    apply: exit 0
    depends_on: [a]
"#,
        );
        let mut ui = MockUI::new();
        let result = run(&temp, "b", &mut ui).unwrap();

        assert_eq!(result, CommandResult::success());
        assert_eq!(ui.successes(), ["Fulfilled 'b'".to_string()]);
        assert_eq!(
            ui.transcript().last(),
            Some(&EventRecord::StepCompleted {
                worked: 2,
                total_work: 2,
                done: true
            })
        );
    }

    #[test]
    fn run_reports_rollback() {
        let temp = setup_project(
            r#"
requirements:
  - name: a
    apply: exit 0
  - name: b
    apply: exit 1
    depends_on: [a]
"#,
        );
        let mut ui = MockUI::new();
        let result = run(&temp, "b", &mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_ROLLED_BACK);
        assert!(ui.errors()[0].contains("'b' failed, rolled back 1"));
    }

    #[test]
    fn run_counts_already_satisfied() {
        let temp = setup_project(
            r#"
requirements:
  - name: a
    check: exit 0
    apply: exit 1
"#,
        );
        let mut ui = MockUI::new();
        run(&temp, "a", &mut ui).unwrap();
        assert_eq!(
            ui.successes(),
            ["Fulfilled 'a' (1 already satisfied)".to_string()]
        );
    }

    #[test]
    fn run_unknown_target_is_error() {
        let temp = setup_project("requirements:\n  - name: a\n    apply: exit 0\n");
        let mut ui = MockUI::new();
        let err = run(&temp, "ghost", &mut ui).unwrap_err();

        assert!(matches!(err, RequisiteError::UnknownRequirement { .. }));
        assert!(ui.transcript().is_empty());
    }

    #[test]
    fn run_without_config_is_error() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let err = run(&temp, "a", &mut ui).unwrap_err();
        assert!(matches!(err, RequisiteError::ConfigNotFound { .. }));
    }
}
