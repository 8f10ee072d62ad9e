use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Controls how the effective project version is derived, the `versioning` section of the config.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct VersioningConfig {
    /// Compute a version for the root project
    pub apply_project: bool,
    /// Compute versions for configured sub-projects as well
    pub apply_sub_projects: bool,
    /// Append the abbreviated HEAD commit hash as build metadata
    pub use_git: bool,
    /// Git directory, relative to the project root (default: ".git")
    pub git_directory: Option<PathBuf>,
    /// Bump the patch component of snapshot versions
    pub auto_increment_snapshot: bool,
    /// Pre-release label for snapshot versions
    pub pre_release: String,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            apply_project: true,
            apply_sub_projects: true,
            use_git: true,
            git_directory: None,
            auto_increment_snapshot: true,
            pre_release: "SNAPSHOT".to_string(),
        }
    }
}
