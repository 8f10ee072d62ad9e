use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use keystone_core::SubprojectConfig;
use keystone_utils::{VersionOverrides, compute_version, last_commit_hash};
use serde::Serialize;

use crate::{CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Compute the effective project version")]
pub struct VersionArgs {
    /// Use this version instead of a snapshot (a leading "v" is dropped)
    #[arg(long)]
    pub alt_ver: Option<String>,

    /// Pre-release label for snapshot versions
    #[arg(long)]
    pub pre_release: Option<String>,

    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVersion {
    pub name: String,
    pub version: String,
}

/// # Errors
/// Returns error if the project version is not configured.
pub async fn handle_version(args: &VersionArgs) -> Result<()> {
    let context = CommandContext::new().await?;
    let versions = project_versions(&context, args)?;
    if versions.is_empty() {
        println!("Versioning is disabled for this project");
        return Ok(());
    }

    let rendered = versions
        .iter()
        .map(|v| format!("{} {}", v.name.bold(), v.version.bright_green()))
        .collect::<Vec<_>>()
        .join("\n");
    args.format.print(&rendered, &versions)
}

/// Versions for the root project and, when enabled, each sub-project declaring its own
///
/// # Errors
/// Returns error if the root project applies versioning without a declared version.
pub fn project_versions(context: &CommandContext, args: &VersionArgs) -> Result<Vec<ProjectVersion>> {
    let project = &context.config.project;
    let versioning = &context.config.versioning;
    let overrides = VersionOverrides {
        alt_ver: args.alt_ver.clone(),
        pre_release: args.pre_release.clone(),
    };
    let commit_hash = if versioning.use_git {
        let git_dir = context.resolve(
            versioning
                .git_directory
                .as_deref()
                .unwrap_or(std::path::Path::new(".git")),
        );
        last_commit_hash(&git_dir)
    } else {
        None
    };

    let mut versions = vec![];
    if versioning.apply_project {
        let declared = project
            .version
            .as_deref()
            .context("project.version must be configured to compute a version")?;
        versions.push(ProjectVersion {
            name: project.name.clone().unwrap_or_else(|| "root".to_string()),
            version: compute_version(declared, &overrides, commit_hash.as_deref(), versioning),
        });
    }
    if versioning.apply_sub_projects {
        let version_of = |declared: &str| {
            compute_version(declared, &overrides, commit_hash.as_deref(), versioning)
        };
        push_subproject_versions(&project.subprojects, None, &version_of, &mut versions);
    }
    Ok(versions)
}

/// Depth-first, parents before children; nested names are joined with `:`
fn push_subproject_versions(
    subprojects: &[SubprojectConfig],
    parent: Option<&str>,
    version_of: &dyn Fn(&str) -> String,
    versions: &mut Vec<ProjectVersion>,
) {
    for subproject in subprojects {
        let name = match parent {
            Some(parent) => format!("{parent}:{}", subproject.name),
            None => subproject.name.clone(),
        };
        match subproject.version.as_deref() {
            Some(declared) => versions.push(ProjectVersion {
                name: name.clone(),
                version: version_of(declared),
            }),
            None => log::debug!("Sub-project {name} declares no version"),
        }
        push_subproject_versions(&subproject.subprojects, Some(&name), version_of, versions);
    }
}
