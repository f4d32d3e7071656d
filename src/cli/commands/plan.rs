//! Plan command implementation.
//!
//! The `requisite plan <target>` command prints the fulfillment order
//! without running anything.

use std::path::{Path, PathBuf};

use crate::cli::args::PlanArgs;
use crate::error::Result;
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::Project;

/// The plan command implementation.
pub struct PlanCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: PlanArgs,
}

impl PlanCommand {
    /// Create a new plan command.
    pub fn new(project_root: &Path, config: Option<&Path>, args: PlanArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            args,
        }
    }

    /// Requirement names in fulfillment order.
    fn order(&self) -> Result<Vec<String>> {
        let project = Project::load(&self.project_root, self.config.as_deref())?;
        let order = project
            .set
            .collect_requirements(&self.args.target)?
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        Ok(order)
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let order = self.order()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&order).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = Theme::detect();
        let total = order.len();
        for (i, name) in order.iter().enumerate() {
            ui.message(&format!(
                "{} {}",
                theme.step_number.apply_to(format!("[{}/{}]", i + 1, total)),
                theme.step_title.apply_to(name)
            ));
        }

        Ok(CommandResult::success())
    }
}
