use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

use crate::MigrationConfig;

/// Fully resolved parameters of one migration run, as handed to the engine.
///
/// Serialized as camelCase JSON when crossing into a driver library. Optional fields that
/// were never configured are omitted so the engine falls back to its own defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRunConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub schemas: Vec<String>,
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
    pub group: bool,
    pub clean_on_validation_error: bool,
    pub clean_disabled: bool,
    pub table: String,
    pub encoding: String,
    pub sql_migration_prefix: String,
    pub repeatable_sql_migration_prefix: String,
    pub sql_migration_separator: String,
    pub sql_migration_suffixes: Vec<String>,
    pub driver_classpath: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Vec<String>>,
}

impl MigrationRunConfig {
    /// Merge static configuration with the locations computed for this run.
    ///
    /// # Errors
    /// Returns error if the connection URL is not configured.
    pub fn resolve(
        config: &MigrationConfig,
        locations: Vec<String>,
        driver_classpath: Vec<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            url: config.url()?.to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
            schemas: config.schemas.clone(),
            locations,
            placeholders: config.placeholders.clone(),
            placeholder_prefix: config.placeholder_prefix.clone(),
            placeholder_suffix: config.placeholder_suffix.clone(),
            placeholder_replacement: config.placeholder_replacement,
            validate_migration_naming: config.validate_migration_naming,
            validate_on_migrate: config.validate_on_migrate,
            baseline_on_migrate: config.baseline_on_migrate,
            baseline_version: config.baseline_version.clone(),
            baseline_description: config.baseline_description.clone(),
            out_of_order: config.out_of_order,
            mixed: config.mixed,
            group: config.group_migrations,
            clean_on_validation_error: config.clean_on_validation_error,
            clean_disabled: config.clean_disabled,
            table: config.table.clone(),
            encoding: config.encoding.clone(),
            sql_migration_prefix: config.sql_migration_prefix.clone(),
            repeatable_sql_migration_prefix: config.repeatable_sql_migration_prefix.clone(),
            sql_migration_separator: config.sql_migration_separator.clone(),
            sql_migration_suffixes: config.sql_migration_suffixes.clone(),
            driver_classpath,
            driver: config.driver.clone(),
            default_schema: config.default_schema.clone(),
            tablespace: config.tablespace.clone(),
            target: config.target.clone(),
            callbacks: (!config.callbacks.is_empty()).then(|| config.callbacks.clone()),
        })
    }
}
