use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static migration settings, the `migration` section of `.keystone/config.json`.
///
/// Every field has a default matching the migration engine's conventions. Optional fields
/// left as `None` are never forwarded to the engine, so its own defaults apply.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationConfig {
    /// JDBC-style connection URL (e.g. "jdbc:mysql://localhost/app"). Required to migrate.
    pub url: Option<String>,
    /// Driver class name forwarded to the engine
    pub driver: Option<String>,
    pub user: String,
    pub password: String,
    pub schemas: Vec<String>,
    pub default_schema: Option<String>,
    /// Search locations, e.g. "filesystem:src/main/resources/db/migration" or "classpath:db/migration"
    pub locations: Vec<String>,
    pub placeholders: BTreeMap<String, String>,
    pub placeholder_prefix: String,
    pub placeholder_suffix: String,
    pub placeholder_replacement: bool,
    pub validate_migration_naming: bool,
    pub validate_on_migrate: bool,
    pub baseline_on_migrate: bool,
    pub baseline_version: String,
    pub baseline_description: String,
    pub out_of_order: bool,
    pub mixed: bool,
    pub group_migrations: bool,
    pub clean_on_validation_error: bool,
    /// Destructive clean is forbidden unless explicitly re-enabled
    pub clean_disabled: bool,
    /// Schema history table name
    pub table: String,
    pub tablespace: Option<String>,
    pub encoding: String,
    pub sql_migration_prefix: String,
    pub repeatable_sql_migration_prefix: String,
    pub sql_migration_separator: String,
    pub sql_migration_suffixes: Vec<String>,
    pub callbacks: Vec<String>,
    /// Target version to migrate up to
    pub target: Option<String>,
    /// Merge the common migration pool with per-database overrides and point the engine at the result
    pub enable_rdbms_specific_migrations: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            url: None,
            driver: None,
            user: String::new(),
            password: String::new(),
            schemas: vec!["PUBLIC".to_string()],
            default_schema: None,
            locations: Vec::new(),
            placeholders: BTreeMap::new(),
            placeholder_prefix: "${".to_string(),
            placeholder_suffix: "}".to_string(),
            placeholder_replacement: true,
            validate_migration_naming: true,
            validate_on_migrate: true,
            baseline_on_migrate: false,
            baseline_version: "1".to_string(),
            baseline_description: "<< Flyway Baseline >>".to_string(),
            out_of_order: false,
            mixed: false,
            group_migrations: false,
            clean_on_validation_error: false,
            clean_disabled: true,
            table: "flyway_schema_history".to_string(),
            tablespace: None,
            encoding: "UTF-8".to_string(),
            sql_migration_prefix: "V".to_string(),
            repeatable_sql_migration_prefix: "R".to_string(),
            sql_migration_separator: "__".to_string(),
            sql_migration_suffixes: vec![".sql".to_string()],
            callbacks: Vec::new(),
            target: None,
            enable_rdbms_specific_migrations: false,
        }
    }
}

impl MigrationConfig {
    /// # Errors
    /// Returns error if no connection URL is configured.
    pub fn url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("migration.url is not configured in .keystone/config.json")
    }

    /// Whether `extension` (without the leading dot) is one of the configured migration suffixes
    #[must_use]
    pub fn matches_suffix(&self, extension: &str) -> bool {
        self.sql_migration_suffixes
            .iter()
            .any(|suffix| suffix.trim_start_matches('.') == extension)
    }
}
