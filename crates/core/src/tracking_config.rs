use serde::{Deserialize, Serialize};

/// Glob patterns, relative to the project root, selecting the files whose content
/// invalidates a previous migration run.
///
/// `{mainPackagePath}` in a classpath pattern is replaced by the main package with dots
/// turned into slashes. Patterns containing it are skipped when the main package is unknown.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingConfig {
    pub classpath_migrations: Vec<String>,
    pub build_scripts: Vec<String>,
    pub build_logic: Vec<String>,
    /// File name of the migration state file
    pub checksum_file_name: String,
}

pub const MAIN_PACKAGE_PATH_TOKEN: &str = "{mainPackagePath}";

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            classpath_migrations: vec![
                "src/main/java/{mainPackagePath}/database/migration/migrations/**/*.java"
                    .to_string(),
                "src/main/java/{mainPackagePath}/database/migration/migrations/**/*.kt"
                    .to_string(),
            ],
            build_scripts: vec![
                "build.gradle.kts".to_string(),
                "build.gradle".to_string(),
                "*/build.gradle.kts".to_string(),
                "*/build.gradle".to_string(),
                "settings.gradle.kts".to_string(),
                "settings.gradle".to_string(),
                "gradle/libs.versions.toml".to_string(),
                ".keystone/config.json".to_string(),
            ],
            build_logic: vec![
                "buildSrc/src/main/kotlin/**/*.kt".to_string(),
                "build.gradle.kts".to_string(),
                "build.gradle".to_string(),
            ],
            checksum_file_name: "migration-state.txt".to_string(),
        }
    }
}
