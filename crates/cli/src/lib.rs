use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{
    AssimilateArgs, ConfigArgs, InitArgs, InvalidateArgs, MetadataArgs, MigrateArgs, VersionArgs,
    handle_assimilate, handle_config, handle_init, handle_invalidate, handle_metadata,
    handle_migrate, handle_version,
};
pub mod commands;
mod context;
mod logging;
pub mod options;

pub use context::CommandContext;

#[derive(Parser, Debug)]
#[command(
    name = "keystone",
    author,
    version,
    about = "Project metadata, git-derived versions and database migrations for JVM builds",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init(InitArgs),
    Config(ConfigArgs),
    Metadata(MetadataArgs),
    Version(VersionArgs),
    Assimilate(AssimilateArgs),
    Invalidate(InvalidateArgs),
    Migrate(MigrateArgs),
}

pub async fn main(args: &[String]) -> Result<()> {
    let cli = Cli::parse_from(args);
    logging::init_logging(cli.verbose);
    match cli.command {
        Commands::Init(args) => handle_init(&args).await?,
        Commands::Config(args) => handle_config(&args).await?,
        Commands::Metadata(args) => handle_metadata(&args).await?,
        Commands::Version(args) => handle_version(&args).await?,
        Commands::Assimilate(args) => handle_assimilate(&args).await?,
        Commands::Invalidate(args) => handle_invalidate(&args).await?,
        Commands::Migrate(args) => handle_migrate(&args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_cli_parsing_init() {
        let cli = Cli::parse_from(["keystone", "init", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parsing_version_overrides() {
        let cli = Cli::parse_from([
            "keystone",
            "version",
            "--alt-ver",
            "v2.0.0",
            "--pre-release",
            "RC",
        ]);
        match cli.command {
            Commands::Version(args) => {
                assert_eq!(args.alt_ver.as_deref(), Some("v2.0.0"));
                assert_eq!(args.pre_release.as_deref(), Some("RC"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parsing_migrate_force() {
        let cli = Cli::parse_from(["keystone", "migrate", "--force"]);
        assert!(matches!(cli.command, Commands::Migrate(ref args) if args.force));
    }

    #[test]
    fn test_cli_parsing_assimilate_into() {
        let cli = Cli::parse_from(["keystone", "assimilate", "--into", "out/db"]);
        assert!(matches!(
            cli.command,
            Commands::Assimilate(ref args) if args.into.as_deref() == Some(std::path::Path::new("out/db"))
        ));
    }

    #[rstest]
    #[case(&["keystone", "config"], 0)]
    #[case(&["keystone", "-v", "config"], 1)]
    #[case(&["keystone", "config", "-vv"], 2)]
    #[case(&["keystone", "-vvv", "invalidate"], 3)]
    fn test_cli_verbosity(#[case] args: &[&str], #[case] expected: u8) {
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, expected);
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["keystone"]).is_err());
    }
}
