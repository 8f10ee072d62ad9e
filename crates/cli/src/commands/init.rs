use tokio::fs::{create_dir_all, write};

use anyhow::Result;
use clap::Args;
use keystone_core::{BuildLayout, Config};

use crate::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Initialize keystone configuration in the current project")]
pub struct InitArgs {
    /// If true, do not make any filesystem changes.
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

/// Write `.keystone/config.json` holding the default configuration
///
/// # Errors
/// Returns error if the project is already initialized or the file cannot be written.
pub async fn handle_init(args: &InitArgs) -> Result<()> {
    let layout = BuildLayout::new(CommandContext::current_dir()?);
    let config_file = layout.config_file();
    if config_file.exists() {
        anyhow::bail!("keystone project already initialized");
    }

    if !args.dry_run {
        if let Some(config_dir) = config_file.parent() {
            create_dir_all(config_dir).await?;
        }
        write(
            &config_file,
            serde_json::to_string_pretty(&Config::default())?,
        )
        .await?;
    }

    println!("keystone project initialized in {}", config_file.display());
    Ok(())
}
