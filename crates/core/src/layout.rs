use std::path::{Path, PathBuf};

pub const MIGRATION_PATH: &str = "db/migration";
pub const CONFIG_DIR: &str = ".keystone";
pub const CONFIG_FILE: &str = "config.json";

const RESOURCE_MIGRATION_DIR: &str = "src/main/resources/db/migration";
const ASSIMILATED_DIR: &str = "build/tmp/assimilateMigrations";
const INVALIDATION_DIR: &str = "build/tmp/invalidateMigrations";
const DATABASE_DIR: &str = "build/generated/flyway";
const PROCESSED_RESOURCES_DIR: &str = "build/resources/main";
const APPLIED_STATE_FILE: &str = "migration-state.applied.txt";

/// Fixed directory layout of a project, resolved against its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    root: PathBuf,
}

impl BuildLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Common migration pool; each immediate subdirectory is a database-specific pool
    pub fn migration_root(&self) -> PathBuf {
        self.root.join(RESOURCE_MIGRATION_DIR)
    }

    /// One subdirectory per database identifier
    pub fn assimilated_root(&self) -> PathBuf {
        self.root.join(ASSIMILATED_DIR)
    }

    pub fn state_file(&self, checksum_file_name: &str) -> PathBuf {
        self.root.join(INVALIDATION_DIR).join(checksum_file_name)
    }

    pub fn database_dir(&self) -> PathBuf {
        self.root.join(DATABASE_DIR)
    }

    /// Fingerprint of the inputs of the last successful migration run
    pub fn applied_state_file(&self) -> PathBuf {
        self.database_dir().join(APPLIED_STATE_FILE)
    }

    pub fn processed_migrations_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_RESOURCES_DIR).join(MIGRATION_PATH)
    }
}
