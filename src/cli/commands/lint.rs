//! Lint command implementation.
//!
//! The `requisite lint` command validates the configuration file and the
//! dependency graph it describes, reporting every problem found.

use std::path::{Path, PathBuf};

use crate::config::{load_config, validate_config};
use crate::error::Result;
use crate::requirements::{CommandRequirement, RequirementSet};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_CONFIG_ERROR};

/// The lint command implementation.
pub struct LintCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
}

impl LintCommand {
    /// Create a new lint command.
    pub fn new(project_root: &Path, config: Option<&Path>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
        }
    }
}

impl Command for LintCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (path, config) = load_config(&self.project_root, self.config.as_deref())?;

        let errors = validate_config(&config);
        if !errors.is_empty() {
            for error in &errors {
                ui.error(&format!("[{}] {}", error.rule, error.message));
            }
            return Ok(CommandResult::failure(EXIT_CONFIG_ERROR));
        }

        let mut set = RequirementSet::new();
        for requirement in &config.requirements {
            set.add_requirement(CommandRequirement::from_config(
                requirement,
                &config.settings,
            ));
        }
        if let Err(e) = set.validate() {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(EXIT_CONFIG_ERROR));
        }

        ui.success(&format!(
            "{} is valid ({} requirements)",
            path.display(),
            set.len()
        ));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn lint(config: &str) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requisite.yml"), config).unwrap();
        let cmd = LintCommand::new(temp.path(), None);
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn lint_valid_config() {
        let (result, ui) = lint("requirements:\n  - name: a\n    apply: exit 0\n");
        assert!(result.success);
        assert!(ui.successes()[0].contains("(1 requirements)"));
    }

    #[test]
    fn lint_reports_every_shape_error() {
        let (result, ui) = lint(
            r#"
requirements:
  - name: a
    apply: ""
  - name: a
    apply: exit 0
"#,
        );
        assert_eq!(result.exit_code, EXIT_CONFIG_ERROR);
        assert_eq!(ui.errors().len(), 2);
        assert!(ui.errors().iter().any(|e| e.starts_with("[missing-apply]")));
        assert!(ui.errors().iter().any(|e| e.starts_with("[duplicate-name]")));
    }

    #[test]
    fn lint_reports_cycle() {
        let (result, ui) = lint(
            r#"
requirements:
  - name: a
    apply: exit 0
    depends_on: [b]
  - name: b
    apply: exit 0
    depends_on: [a]
"#,
        );
        assert_eq!(result.exit_code, EXIT_CONFIG_ERROR);
        assert!(ui.errors()[0].contains("a -> b -> a"));
    }
}
