use std::path::{Path, PathBuf};

use keystone_core::{MigrateOutcome, MigrationConfig, MigrationEngine, MigrationRunConfig};

use crate::{DriverLoader, EngineRegistry, MigrateError, extract_jdbc_prefix, resolve_locations};

/// Runs the migration engine once against the configured database
#[derive(Debug)]
pub struct MigrationExecutor<'a> {
    config: &'a MigrationConfig,
    assimilated_root: PathBuf,
    driver_classpath: Vec<PathBuf>,
}

impl<'a> MigrationExecutor<'a> {
    pub fn new(
        config: &'a MigrationConfig,
        assimilated_root: impl Into<PathBuf>,
        driver_classpath: Vec<PathBuf>,
    ) -> Self {
        Self {
            config,
            assimilated_root: assimilated_root.into(),
            driver_classpath,
        }
    }

    pub fn assimilated_root(&self) -> &Path {
        &self.assimilated_root
    }

    pub fn resolve_locations(&self) -> Vec<String> {
        resolve_locations(self.config, &self.assimilated_root)
    }

    /// # Errors
    /// Returns error if the connection URL is not configured.
    pub fn run_config(&self) -> Result<MigrationRunConfig, MigrateError> {
        MigrationRunConfig::resolve(
            self.config,
            self.resolve_locations(),
            self.driver_classpath.clone(),
        )
        .map_err(|e| MigrateError::Config(format!("{e:#}")))
    }

    /// Load the engine for the configured URL and run it.
    ///
    /// Driver libraries stay loaded only for the duration of this call.
    ///
    /// # Errors
    /// Returns error if configuration is incomplete, no driver is available or the engine fails.
    pub fn execute(&self, registry: &EngineRegistry) -> Result<MigrateOutcome, MigrateError> {
        let run_config = self.run_config()?;
        let prefix = extract_jdbc_prefix(&run_config.url).unwrap_or_default();
        let engine = DriverLoader::new(self.driver_classpath.clone(), registry).load(prefix)?;
        run_engine(engine.as_ref(), &run_config)
    }

    /// Run a given engine, bypassing driver loading
    ///
    /// # Errors
    /// Returns error if configuration is incomplete or the engine fails.
    pub fn execute_with(&self, engine: &dyn MigrationEngine) -> Result<MigrateOutcome, MigrateError> {
        let run_config = self.run_config()?;
        run_engine(engine, &run_config)
    }
}

fn run_engine(
    engine: &dyn MigrationEngine,
    run_config: &MigrationRunConfig,
) -> Result<MigrateOutcome, MigrateError> {
    log::debug!(
        "Running {} with locations {:?}",
        engine.name(),
        run_config.locations
    );
    let outcome = engine.migrate(run_config)?;
    log::info!(
        "Migration completed: {} migrations executed",
        outcome.migrations_executed
    );
    for warning in &outcome.warnings {
        log::warn!("{warning}");
    }
    Ok(outcome)
}
