use anyhow::Result;
use clap::Args;

use crate::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Print the resolved keystone configuration")]
pub struct ConfigArgs {}

/// Display keystone configuration, defaults included
///
/// # Errors
/// Returns error if reading the configuration fails.
pub async fn handle_config(_args: &ConfigArgs) -> Result<()> {
    let context = CommandContext::new().await?;
    println!("{}", serde_json::to_string_pretty(&context.config)?);
    Ok(())
}
