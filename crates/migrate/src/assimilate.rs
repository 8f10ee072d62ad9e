//! Merge the common migration pool with per-database overrides.
//!
//! Layout of the migration root:
//!
//! ```text
//! db/migration/
//!   V1__init.sql          common pool (direct children only)
//!   V2__seed.sql
//!   mysql/                database-specific pool, searched recursively
//!     V2__seed.sql        overrides the common V2__seed.sql for mysql
//!     V3__mysql_only.sql
//! ```
//!
//! Every immediate subdirectory is a database pool; no directory is filtered out.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use keystone_core::MigrationConfig;
use keystone_utils::{child_directories, find_files};

/// Migration scripts keyed by file name. Matching across pools is by name only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationPool {
    files: BTreeMap<String, PathBuf>,
}

impl MigrationPool {
    /// Scan `dir` for files with a configured migration suffix. `max_depth` of `Some(1)`
    /// restricts the scan to direct children.
    ///
    /// # Errors
    /// Returns error if `dir` cannot be walked.
    pub fn scan(dir: &Path, max_depth: Option<usize>, config: &MigrationConfig) -> Result<Self> {
        let mut files = BTreeMap::new();
        for path in find_files(dir, max_depth, |extension| config.matches_suffix(extension))? {
            let name = path
                .file_name()
                .context(format!("File name not found - {}", path.display()))?
                .to_string_lossy()
                .to_string();
            if let Some(previous) = files.insert(name, path.clone()) {
                log::debug!(
                    "Duplicate migration name, {} replaces {}",
                    path.display(),
                    previous.display()
                );
            }
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.files.get(name).map(PathBuf::as_path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Union of both pools by name; a name present in `specific` resolves to its file
    pub fn overlay<'a>(common: &'a Self, specific: &'a Self) -> BTreeMap<&'a str, MigrationSource<'a>> {
        let mut merged = BTreeMap::new();
        for (name, path) in &common.files {
            merged.insert(name.as_str(), MigrationSource::Common(path));
        }
        for (name, path) in &specific.files {
            merged.insert(name.as_str(), MigrationSource::Specific(path));
        }
        merged
    }
}

/// Which pool a merged migration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationSource<'a> {
    Common(&'a Path),
    Specific(&'a Path),
}

impl<'a> MigrationSource<'a> {
    pub fn path(&self) -> &'a Path {
        match self {
            Self::Common(path) | Self::Specific(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Common(_) => "common",
            Self::Specific(_) => "specific",
        }
    }
}

/// Result of one assimilation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssimilationReport {
    /// `false` when the migration root was missing and nothing was written
    pub performed: bool,
    pub common_migrations: usize,
    /// Database identifier -> file names written for it
    pub databases: BTreeMap<String, Vec<String>>,
}

/// Writes one merged migration directory per database below `output_dir`.
#[derive(Debug)]
pub struct Assimilator<'a> {
    migration_root: PathBuf,
    output_dir: PathBuf,
    config: &'a MigrationConfig,
}

impl<'a> Assimilator<'a> {
    pub fn new(
        migration_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: &'a MigrationConfig,
    ) -> Self {
        Self {
            migration_root: migration_root.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Rebuild the output directory from scratch
    ///
    /// # Errors
    /// Returns error if the output directory cannot be recreated or a file cannot be copied.
    pub fn assimilate(&self) -> Result<AssimilationReport> {
        if !self.migration_root.is_dir() {
            log::error!(
                "Migration directory does not exist: {}",
                self.migration_root.display()
            );
            return Ok(AssimilationReport::default());
        }

        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)
                .context(format!("Failed to clean {}", self.output_dir.display()))?;
        }
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let common = MigrationPool::scan(&self.migration_root, Some(1), self.config)?;
        log::info!("Found {} common migrations", common.len());

        let mut report = AssimilationReport {
            performed: true,
            common_migrations: common.len(),
            databases: BTreeMap::new(),
        };
        for database_dir in child_directories(&self.migration_root)? {
            let (database, written) = self.assimilate_database(&database_dir, &common)?;
            report.databases.insert(database, written);
        }

        log::info!(
            "Assimilated migrations for {} RDBMS types",
            report.databases.len()
        );
        Ok(report)
    }

    fn assimilate_database(
        &self,
        database_dir: &Path,
        common: &MigrationPool,
    ) -> Result<(String, Vec<String>)> {
        let database = database_dir
            .file_name()
            .context(format!("Directory name not found - {}", database_dir.display()))?
            .to_string_lossy()
            .to_string();
        let specific = MigrationPool::scan(database_dir, None, self.config)?;
        let target_dir = self.output_dir.join(&database);
        fs::create_dir_all(&target_dir)
            .context(format!("Failed to create {}", target_dir.display()))?;

        log::debug!(
            "Processing {database}: {} specific, {} common migrations",
            specific.len(),
            common.len()
        );

        let mut written = vec![];
        for (name, source) in MigrationPool::overlay(common, &specific) {
            let target = target_dir.join(name);
            fs::copy(source.path(), &target).context(format!(
                "Failed to copy {} to {}",
                source.path().display(),
                target.display()
            ))?;
            log::debug!("Copied {} migration: {name} to {database}", source.kind());
            written.push(name.to_string());
        }
        Ok((database, written))
    }
}

/// Copy an assimilated tree into a resource output directory.
///
/// Every database directory already in `target` is removed first, so overrides and databases
/// deleted from the source do not survive; files directly in `target` are left alone.
/// Returns the number of files copied; a missing source copies nothing.
///
/// # Errors
/// Returns error if a stale directory cannot be removed or a file cannot be copied.
pub fn copy_assimilated(source: &Path, target: &Path) -> Result<usize> {
    if !source.is_dir() {
        log::warn!(
            "Source directory {} does not exist, skipping migration copy",
            source.display()
        );
        return Ok(0);
    }

    if target.is_dir() {
        for stale in child_directories(target)? {
            fs::remove_dir_all(&stale).context(format!("Failed to clean {}", stale.display()))?;
        }
    }

    let files = find_files(source, None, |_| true)?;
    for file in &files {
        let relative = file.strip_prefix(source)?;
        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(file, &destination).context(format!(
            "Failed to copy {} to {}",
            file.display(),
            destination.display()
        ))?;
    }
    log::info!(
        "Copied assimilated migrations from {} to {}",
        source.display(),
        target.display()
    );
    Ok(files.len())
}
