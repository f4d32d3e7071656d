//! List command implementation.
//!
//! The `requisite list` command lists requirements in registration order.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::Project;

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: ListArgs,
}

/// One row of `list --json` output.
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    depends_on: &'a [String],
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, config: Option<&Path>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = Project::load(&self.project_root, self.config.as_deref())?;

        let entries: Vec<ListEntry<'_>> = project
            .set
            .requirement_ids()
            .into_iter()
            .filter_map(|name| project.config.requirement(name))
            .map(|r| ListEntry {
                name: &r.name,
                description: r.description.as_deref(),
                depends_on: &r.depends_on,
            })
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = Theme::detect();
        ui.message(&format!(
            "{} {}",
            theme.step_title.apply_to("Requirements"),
            theme.dim.apply_to(format!("({})", project.path.display()))
        ));
        for entry in &entries {
            ui.message(&format!("  {}", theme.step_title.apply_to(entry.name)));
            if let Some(desc) = entry.description {
                ui.message(&format!("    {}", theme.dim.apply_to(desc)));
            }
            if !entry.depends_on.is_empty() {
                ui.message(&format!(
                    "    {}",
                    theme
                        .dim
                        .apply_to(format!("└── depends on: {}", entry.depends_on.join(", ")))
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
