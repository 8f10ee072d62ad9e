use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{MigrationConfig, TrackingConfig, VersioningConfig};

/// Loaded from `.keystone/config.json`, the single immutable configuration every stage reads.
///
/// Each section defaults independently, so a config file only needs the keys it overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub migration: MigrationConfig,

    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Shared libraries (or directories of them) providing the database driver
    #[serde(default)]
    pub driver_classpath: Vec<PathBuf>,
}

/// Project properties, the inputs to metadata derivation and versioning.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub group: Option<String>,
    pub name: Option<String>,
    /// Declared version, e.g. "1.4.0" or "v1.4.0"
    pub version: Option<String>,
    /// Comma or space separated
    pub authors: Option<String>,
    /// Comma or space separated
    pub contributors: Option<String>,
    #[serde(default)]
    pub subprojects: Vec<SubprojectConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubprojectConfig {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Nested sub-projects, addressed as `parent:child`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subprojects: Vec<SubprojectConfig>,
}
