use anyhow::Result;
use keystone_core::{BuildLayout, Config};
use keystone_utils::get_keystone_config;
use std::path::{Path, PathBuf};

/// Project root, loaded configuration and build layout shared by every command
#[derive(Debug)]
pub struct CommandContext {
    pub config: Config,
    pub layout: BuildLayout,
}

impl CommandContext {
    /// # Errors
    /// Returns error if the current directory or the configuration cannot be read.
    pub async fn new() -> Result<Self> {
        Self::load(&Self::current_dir()?).await
    }

    /// # Errors
    /// Returns error if the configuration exists but cannot be read.
    pub async fn load(root: &Path) -> Result<Self> {
        let config = get_keystone_config(root).await?;
        Ok(Self {
            config,
            layout: BuildLayout::new(root),
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Resolve a user-supplied path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root().join(path)
    }

    /// # Errors
    /// Returns error if retrieving the current directory fails.
    pub fn current_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}
