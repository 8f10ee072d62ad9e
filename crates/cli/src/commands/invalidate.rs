use anyhow::Result;
use clap::Args;
use keystone_core::ProjectMetadata;
use keystone_migrate::{TrackedInputs, invalidate_migrations};

use crate::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Fingerprint every input that can change the database")]
pub struct InvalidateArgs {}

/// Write the migration state file
///
/// # Errors
/// Returns error if inputs cannot be discovered or the state file cannot be written.
pub async fn handle_invalidate(_args: &InvalidateArgs) -> Result<()> {
    let CommandContext { config, layout } = CommandContext::new().await?;

    let (output, tracked) = tokio::task::spawn_blocking(move || -> Result<_> {
        let metadata = ProjectMetadata::derive(&config.project);
        let inputs = TrackedInputs::discover(&layout, &config, metadata.as_ref())?;
        let output = layout.state_file(&config.tracking.checksum_file_name);
        invalidate_migrations(&inputs, &output)?;
        Ok((output, inputs.len()))
    })
    .await??;

    println!("Tracked {tracked} files in {}", output.display());
    Ok(())
}
