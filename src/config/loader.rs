//! Configuration file discovery and loading.
//!
//! Searched in the project root, first match wins:
//! 1. `requisite.yml`
//! 2. `.requisite/config.yml`

use crate::config::schema::RequisiteConfig;
use crate::error::{RequisiteError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names relative to the project root, in search order.
pub const CONFIG_CANDIDATES: &[&str] = &["requisite.yml", ".requisite/config.yml"];

/// Find the config file for a project root.
pub fn discover_config(project_root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| project_root.join(candidate))
        .find(|path| path.is_file())
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<RequisiteConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RequisiteError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RequisiteError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a config.
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<RequisiteConfig> {
    serde_yaml::from_str(content).map_err(|e| RequisiteError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// A relative override is resolved against `project_root`. Returns the
/// path that was loaded along with the config.
pub fn load_config(
    project_root: &Path,
    config_override: Option<&Path>,
) -> Result<(PathBuf, RequisiteConfig)> {
    let path = match config_override {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => project_root.join(path),
        None => discover_config(project_root).ok_or_else(|| RequisiteError::ConfigNotFound {
            path: project_root.join(CONFIG_CANDIDATES[0]),
        })?,
    };

    tracing::debug!(path = %path.display(), "Loading config");
    let config = load_config_file(&path)?;
    Ok((path, config))
}
