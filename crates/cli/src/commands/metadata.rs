use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use keystone_core::ProjectMetadata;

use crate::{CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Show metadata derived from project group and name")]
pub struct MetadataArgs {
    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,
}

/// # Errors
/// Returns error if group or name is not configured.
pub async fn handle_metadata(args: &MetadataArgs) -> Result<()> {
    let context = CommandContext::new().await?;
    let metadata = ProjectMetadata::derive(&context.config.project)
        .context("project.group and project.name must be configured to derive metadata")?;
    args.format.print(&render(&metadata), &metadata)
}

fn render(metadata: &ProjectMetadata) -> String {
    let mut lines = vec![
        format!("{} {}", "mainPackage:".bold(), metadata.main_package),
        format!("{} {}", "entryPointClass:".bold(), metadata.entry_point_class),
        format!("{} {}", "relocationPackage:".bold(), metadata.relocation_package),
    ];
    if !metadata.authors.is_empty() {
        lines.push(format!("{} {}", "authors:".bold(), metadata.authors.join(", ")));
    }
    if !metadata.contributors.is_empty() {
        lines.push(format!(
            "{} {}",
            "contributors:".bold(),
            metadata.contributors.join(", ")
        ));
    }
    lines.join("\n")
}
