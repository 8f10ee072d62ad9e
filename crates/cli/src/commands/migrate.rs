use anyhow::Result;
use clap::Args;
use colored::Colorize;
use keystone_migrate::{EngineRegistry, MigrationPipeline, PipelineOutcome};

use crate::{CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Assimilate, fingerprint and apply migrations to the configured database")]
pub struct MigrateArgs {
    /// Run the engine even when tracked inputs are unchanged since the last run
    #[arg(long, default_value = "false")]
    pub force: bool,

    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,
}

/// Engines compiled into this binary; driver libraries on the classpath take precedence.
fn builtin_engines() -> EngineRegistry {
    EngineRegistry::new()
}

/// # Errors
/// Returns error if any stage fails; engine errors keep the engine's message.
pub async fn handle_migrate(args: &MigrateArgs) -> Result<()> {
    let CommandContext { config, layout } = CommandContext::new().await?;
    let force = args.force;

    let outcome = tokio::task::spawn_blocking(move || {
        MigrationPipeline::new(&config, &layout).run(&builtin_engines(), force)
    })
    .await??;

    match outcome {
        PipelineOutcome::UpToDate => args.format.print(
            &"Migrations are up to date".green().to_string(),
            &serde_json::json!({ "upToDate": true }),
        ),
        PipelineOutcome::Migrated(outcome) => {
            args.format.print(&outcome.to_string(), &outcome)
        }
    }
}
