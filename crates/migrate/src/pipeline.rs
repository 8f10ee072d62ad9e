use std::path::PathBuf;

use anyhow::Result;
use keystone_core::{BuildLayout, Config, MigrateOutcome, ProjectMetadata};

use crate::{
    Assimilator, DriverLoader, EngineRegistry, InvalidationFingerprint, MigrationExecutor,
    TrackedInputs, copy_assimilated, invalidate_migrations,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Tracked inputs match the last successful run; the engine was not invoked
    UpToDate,
    Migrated(MigrateOutcome),
}

/// assimilate -> fingerprint -> execute, for one project root
#[derive(Debug)]
pub struct MigrationPipeline<'a> {
    config: &'a Config,
    layout: &'a BuildLayout,
}

impl<'a> MigrationPipeline<'a> {
    pub fn new(config: &'a Config, layout: &'a BuildLayout) -> Self {
        Self { config, layout }
    }

    /// Driver classpath entries resolved against the project root
    pub fn driver_classpath(&self) -> Vec<PathBuf> {
        self.config
            .driver_classpath
            .iter()
            .map(|entry| self.layout.root().join(entry))
            .collect()
    }

    /// # Errors
    /// Returns error if a stage fails; engine errors keep the engine's message.
    pub fn run(&self, registry: &EngineRegistry, force: bool) -> Result<PipelineOutcome> {
        let migration = &self.config.migration;
        if migration.enable_rdbms_specific_migrations {
            let report = Assimilator::new(
                self.layout.migration_root(),
                self.layout.assimilated_root(),
                migration,
            )
            .assimilate()?;
            if report.performed {
                copy_assimilated(
                    &self.layout.assimilated_root(),
                    &self.layout.processed_migrations_dir(),
                )?;
            }
        }

        let metadata = ProjectMetadata::derive(&self.config.project);
        let inputs = TrackedInputs::discover(self.layout, self.config, metadata.as_ref())?;
        let fingerprint = invalidate_migrations(
            &inputs,
            &self
                .layout
                .state_file(&self.config.tracking.checksum_file_name),
        )?;

        let driver_classpath = self.driver_classpath();
        let libraries = DriverLoader::new(driver_classpath.clone(), registry).libraries()?;
        let baseline = fingerprint.with_driver_libraries(&libraries);

        let applied_state = self.layout.applied_state_file();
        if !force && InvalidationFingerprint::read(&applied_state)?.as_ref() == Some(&baseline) {
            log::info!("Migrations are up to date, skipping migrate");
            return Ok(PipelineOutcome::UpToDate);
        }

        let outcome =
            MigrationExecutor::new(migration, self.layout.assimilated_root(), driver_classpath)
                .execute(registry)?;
        baseline.write(&applied_state)?;
        Ok(PipelineOutcome::Migrated(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_core::{EngineError, MigrationConfig, MigrationEngine, MigrationRunConfig};
    use std::{
        fs,
        path::Path,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };
    use tempfile::TempDir;

    #[derive(Debug)]
    struct CountingEngine {
        runs: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MigrationEngine for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        fn migrate(&self, config: &MigrationRunConfig) -> Result<MigrateOutcome, EngineError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EngineError::new("Unable to obtain connection from database"));
            }
            Ok(MigrateOutcome {
                migrations_executed: config.locations.len() as u32,
                warnings: vec![],
            })
        }
    }

    fn registry(fail: bool) -> (EngineRegistry, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let mut registry = EngineRegistry::new();
        registry.register("*", move || {
            Box::new(CountingEngine {
                runs: counter.clone(),
                fail,
            })
        });
        (registry, runs)
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project(rdbms_specific: bool) -> (TempDir, BuildLayout, Config) {
        let temp_dir = TempDir::new().unwrap();
        let layout = BuildLayout::new(temp_dir.path().canonicalize().unwrap());
        let migrations = layout.migration_root();
        write(&migrations.join("V1__init.sql"), "create table users (id int);");
        write(&migrations.join("mysql/V2__seed.sql"), "insert into users values (1);");
        write(&layout.root().join("build.gradle.kts"), "plugins { java }");

        let config = Config {
            migration: MigrationConfig {
                url: Some("jdbc:mysql://localhost:3306/app".to_string()),
                enable_rdbms_specific_migrations: rdbms_specific,
                ..Default::default()
            },
            ..Default::default()
        };
        (temp_dir, layout, config)
    }

    #[test]
    fn test_skips_engine_when_inputs_unchanged() {
        let (temp_dir, layout, config) = project(true);
        let (registry, runs) = registry(false);
        let pipeline = MigrationPipeline::new(&config, &layout);

        let first = pipeline.run(&registry, false).unwrap();
        assert!(matches!(first, PipelineOutcome::Migrated(_)));
        assert!(layout.applied_state_file().is_file());
        assert!(
            layout
                .assimilated_root()
                .join("mysql/V1__init.sql")
                .is_file()
        );
        assert!(
            layout
                .processed_migrations_dir()
                .join("mysql/V2__seed.sql")
                .is_file()
        );

        assert_eq!(pipeline.run(&registry, false).unwrap(), PipelineOutcome::UpToDate);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_reruns_engine_after_change() {
        let (temp_dir, layout, config) = project(false);
        let (registry, runs) = registry(false);
        let pipeline = MigrationPipeline::new(&config, &layout);

        pipeline.run(&registry, false).unwrap();
        write(
            &layout.migration_root().join("V3__add_email.sql"),
            "alter table users add email text;",
        );
        assert!(matches!(
            pipeline.run(&registry, false).unwrap(),
            PipelineOutcome::Migrated(_)
        ));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert!(!layout.assimilated_root().exists());
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_config_change_reruns_engine() {
        let (temp_dir, layout, mut config) = project(false);
        write(
            &layout.config_file(),
            r#"{"migration": {"url": "jdbc:h2:mem:a"}}"#,
        );
        config.migration.url = Some("jdbc:h2:mem:a".to_string());
        let (registry, runs) = registry(false);

        MigrationPipeline::new(&config, &layout)
            .run(&registry, false)
            .unwrap();

        write(
            &layout.config_file(),
            r#"{"migration": {"url": "jdbc:postgresql://prod/db", "target": "5"}}"#,
        );
        config.migration.url = Some("jdbc:postgresql://prod/db".to_string());
        config.migration.target = Some("5".to_string());
        let second = MigrationPipeline::new(&config, &layout)
            .run(&registry, false)
            .unwrap();

        assert!(matches!(second, PipelineOutcome::Migrated(_)));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_driver_library_change_reruns_engine() {
        let (temp_dir, layout, mut config) = project(false);
        let library = layout
            .root()
            .join("drivers")
            .join(format!("libstub.{}", std::env::consts::DLL_EXTENSION));
        write(&library, "not a real library");
        config.driver_classpath = vec![PathBuf::from("drivers")];
        let (registry, runs) = registry(false);
        let pipeline = MigrationPipeline::new(&config, &layout);

        pipeline.run(&registry, false).unwrap();
        assert_eq!(pipeline.run(&registry, false).unwrap(), PipelineOutcome::UpToDate);

        write(&library, "a different build of the library");
        assert!(matches!(
            pipeline.run(&registry, false).unwrap(),
            PipelineOutcome::Migrated(_)
        ));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_force_runs_engine() {
        let (temp_dir, layout, config) = project(true);
        let (registry, runs) = registry(false);
        let pipeline = MigrationPipeline::new(&config, &layout);

        pipeline.run(&registry, false).unwrap();
        pipeline.run(&registry, true).unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_failed_run_does_not_record_baseline() {
        let (temp_dir, layout, config) = project(true);
        let (registry, runs) = registry(true);
        let pipeline = MigrationPipeline::new(&config, &layout);

        let error = pipeline.run(&registry, false).unwrap_err();
        assert_eq!(error.to_string(), "Unable to obtain connection from database");
        assert!(!layout.applied_state_file().exists());
        assert!(
            layout
                .state_file(&config.tracking.checksum_file_name)
                .is_file()
        );

        pipeline.run(&registry, false).unwrap_err();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_driver_classpath_is_relative_to_root() {
        let (temp_dir, layout, mut config) = project(false);
        config.driver_classpath = vec![PathBuf::from("drivers"), PathBuf::from("/opt/drivers")];
        let pipeline = MigrationPipeline::new(&config, &layout);
        assert_eq!(
            pipeline.driver_classpath(),
            vec![layout.root().join("drivers"), PathBuf::from("/opt/drivers")]
        );
        temp_dir.close().unwrap();
    }
}
