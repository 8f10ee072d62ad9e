use std::path::Path;

use anyhow::{Context, Result};
use keystone_core::{BuildLayout, Config};
use tokio::fs::read_to_string;

/// Load `.keystone/config.json` below `root`, falling back to defaults when it does not exist
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub async fn get_keystone_config(root: &Path) -> Result<Config> {
    let config_file = BuildLayout::new(root).config_file();
    if !config_file.is_file() {
        log::debug!("No config at {}, using defaults", config_file.display());
        return Ok(Config::default());
    }
    let content = read_to_string(&config_file)
        .await
        .context(format!("Failed to read {}", config_file.display()))?;
    let config = serde_json::from_str(&content)
        .context(format!("Failed to parse {}", config_file.display()))?;
    Ok(config)
}
