//! Migration state file: one line per tracked input, compared byte-for-byte between runs.

use std::{
    collections::BTreeSet,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use keystone_core::{BuildLayout, Config, MAIN_PACKAGE_PATH_TOKEN, ProjectMetadata};
use keystone_utils::{FileIdentity, find_files, fingerprint_file, glob_files};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrackedCategory {
    Filesystem,
    Classpath,
    BuildScript,
    BuildLogic,
}

impl TrackedCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Classpath => "classpath",
            Self::BuildScript => "buildscript",
            Self::BuildLogic => "buildlogic",
        }
    }
}

impl Display for TrackedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Files whose content decides whether migrations must run again.
#[derive(Debug, Default, Clone)]
pub struct TrackedInputs {
    pub filesystem_migrations: Vec<PathBuf>,
    pub classpath_migrations: Vec<PathBuf>,
    pub build_scripts: Vec<PathBuf>,
    pub build_logic: Vec<PathBuf>,
}

impl TrackedInputs {
    /// Discover tracked inputs below the project root using the configured patterns
    ///
    /// # Errors
    /// Returns error if a pattern is invalid or the migration root cannot be walked.
    pub fn discover(
        layout: &BuildLayout,
        config: &Config,
        metadata: Option<&ProjectMetadata>,
    ) -> Result<Self> {
        let migration_root = layout.migration_root();
        let filesystem_migrations = if migration_root.is_dir() {
            find_files(&migration_root, None, |extension| {
                config.migration.matches_suffix(extension)
            })?
        } else {
            vec![]
        };

        let classpath_patterns = match metadata {
            Some(metadata) => config
                .tracking
                .classpath_migrations
                .iter()
                .map(|pattern| {
                    pattern.replace(MAIN_PACKAGE_PATH_TOKEN, &metadata.main_package_path())
                })
                .collect::<Vec<_>>(),
            None => config
                .tracking
                .classpath_migrations
                .iter()
                .filter(|pattern| !pattern.contains(MAIN_PACKAGE_PATH_TOKEN))
                .cloned()
                .collect::<Vec<_>>(),
        };

        Ok(Self {
            filesystem_migrations,
            classpath_migrations: glob_files(layout.root(), &classpath_patterns)?,
            build_scripts: glob_files(layout.root(), &config.tracking.build_scripts)?,
            build_logic: glob_files(layout.root(), &config.tracking.build_logic)?,
        })
    }

    /// Categories in their fixed fingerprint order
    pub fn categories(&self) -> [(TrackedCategory, &[PathBuf]); 4] {
        [
            (TrackedCategory::Filesystem, self.filesystem_migrations.as_slice()),
            (TrackedCategory::Classpath, self.classpath_migrations.as_slice()),
            (TrackedCategory::BuildScript, self.build_scripts.as_slice()),
            (TrackedCategory::BuildLogic, self.build_logic.as_slice()),
        ]
    }

    pub fn len(&self) -> usize {
        self.categories().iter().map(|(_, files)| files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newline-delimited `category:canonicalPath:identity` records. Only ever compared for
/// equality, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationFingerprint(String);

impl InvalidationFingerprint {
    /// Fingerprint every tracked file
    ///
    /// Within each category files are de-duplicated and sorted by canonical path, so the
    /// result does not depend on directory listing order. Unreadable files fall back to their
    /// modification time and are logged as warnings.
    pub fn compute(inputs: &TrackedInputs) -> Self {
        let mut state = String::new();
        for (category, files) in inputs.categories() {
            push_records(&mut state, category.as_str(), files);
        }
        Self(state)
    }

    /// This fingerprint followed by `driver:` records for the given driver libraries.
    ///
    /// Used for the applied baseline, so replacing a driver library reruns migrations.
    #[must_use]
    pub fn with_driver_libraries(&self, libraries: &[PathBuf]) -> Self {
        let mut state = self.0.clone();
        push_records(&mut state, DRIVER_RECORD, libraries);
        Self(state)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read a previously written fingerprint, `None` if there is none
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        Ok(Some(Self(content)))
    }

    /// Write atomically, creating parent directories as needed
    ///
    /// # Errors
    /// Returns error if the directory or file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }
        let temp_path = path.with_extension(format!("{}.tmp", std::process::id()));
        fs::write(&temp_path, &self.0)
            .context(format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            anyhow::Error::new(e).context(format!("Failed to write {}", path.display()))
        })?;
        Ok(())
    }
}

impl Display for InvalidationFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the fingerprint of `inputs` and persist it to `output`
///
/// # Errors
/// Returns error if the state file cannot be written.
pub fn invalidate_migrations(
    inputs: &TrackedInputs,
    output: &Path,
) -> Result<InvalidationFingerprint> {
    let fingerprint = InvalidationFingerprint::compute(inputs);
    fingerprint.write(output)?;
    log::info!("Generated migration state file: {}", output.display());
    Ok(fingerprint)
}

const DRIVER_RECORD: &str = "driver";

fn push_records(state: &mut String, label: &str, files: &[PathBuf]) {
    let canonical = files
        .iter()
        .map(|file| canonical_path(file))
        .collect::<BTreeSet<_>>();
    for path in canonical {
        let identity = fingerprint_file(&path);
        if let FileIdentity::LastModified { cause, .. } = &identity {
            log::warn!("Failed to calculate hash for {}: {cause}", path.display());
        }
        state.push_str(&format!("{label}:{}:{identity}\n", path.display()));
    }
}

fn canonical_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
