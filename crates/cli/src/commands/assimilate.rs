use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use keystone_migrate::{AssimilationReport, Assimilator, copy_assimilated};

use crate::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Merge common migrations with database-specific overrides")]
pub struct AssimilateArgs {
    /// Also copy the assimilated tree into this directory (relative to the project root)
    #[arg(long)]
    pub into: Option<PathBuf>,
}

/// # Errors
/// Returns error if the output directory cannot be rebuilt or copied.
pub async fn handle_assimilate(args: &AssimilateArgs) -> Result<()> {
    let context = CommandContext::new().await?;
    let destination = args.into.as_deref().map(|into| context.resolve(into));
    let CommandContext { config, layout } = context;

    let report = tokio::task::spawn_blocking(move || -> Result<AssimilationReport> {
        let report = Assimilator::new(
            layout.migration_root(),
            layout.assimilated_root(),
            &config.migration,
        )
        .assimilate()?;
        if let Some(destination) = destination {
            copy_assimilated(&layout.assimilated_root(), &destination)?;
        }
        Ok(report)
    })
    .await??;

    if !report.performed {
        println!("{}", "No migration directory found, nothing assimilated".yellow());
        return Ok(());
    }
    println!(
        "{} common migrations, {} databases",
        report.common_migrations.to_string().bright_green(),
        report.databases.len().to_string().bright_green()
    );
    for (database, files) in &report.databases {
        println!("  {} ({} files)", database.bold(), files.len());
    }
    Ok(())
}
