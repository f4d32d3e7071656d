//! Configuration schema definitions.
//!
//! These structs map to the YAML configuration file format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure for `requisite.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequisiteConfig {
    /// Global settings
    pub settings: Settings,

    /// Requirement definitions, in registration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<RequirementConfig>,
}

impl RequisiteConfig {
    /// Look up a requirement definition by name.
    pub fn requirement(&self, name: &str) -> Option<&RequirementConfig> {
        self.requirements.iter().find(|r| r.name == name)
    }
}

/// Settings that apply to every requirement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Environment variables for every command
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Default per-command timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Forward command output lines as progress messages
    #[serde(default, skip_serializing_if = "is_false")]
    pub forward_output: bool,
}

/// One requirement definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequirementConfig {
    /// Unique requirement name
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Command whose success means the requirement is already met
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,

    /// Command that fulfills the requirement
    pub apply: String,

    /// Command that undoes `apply`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensate: Option<String>,

    /// Requirements that must be fulfilled first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Extra environment variables for this requirement's commands
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Per-command timeout in seconds (overrides the global setting)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
