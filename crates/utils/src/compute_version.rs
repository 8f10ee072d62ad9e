use keystone_core::VersioningConfig;
use regex::Regex;
use std::sync::LazyLock;

static PATCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+\.)(\d+)").expect("hardcoded regex must compile")
});

/// Per-invocation inputs that take precedence over configuration
#[derive(Debug, Default, Clone)]
pub struct VersionOverrides {
    /// Use this version verbatim (minus a leading "v") instead of a snapshot
    pub alt_ver: Option<String>,
    /// Pre-release label replacing `VersioningConfig::pre_release`
    pub pre_release: Option<String>,
}

/// Compute the effective version of a project
///
/// An explicit override wins. Otherwise the declared version becomes a snapshot:
/// patch bumped (when enabled), pre-release label appended, and the commit hash
/// attached as uppercase build metadata when git is in use.
#[must_use]
pub fn compute_version(
    declared: &str,
    overrides: &VersionOverrides,
    commit_hash: Option<&str>,
    config: &VersioningConfig,
) -> String {
    if let Some(alt_ver) = &overrides.alt_ver {
        return strip_leading_v(alt_ver).to_string();
    }

    let clean = strip_leading_v(declared);
    let version = if config.auto_increment_snapshot {
        increment_patch(clean)
    } else {
        clean.to_string()
    };
    let pre_release = overrides
        .pre_release
        .as_deref()
        .unwrap_or(&config.pre_release);

    match commit_hash {
        Some(hash) if config.use_git => {
            format!("{version}-{pre_release}+{}", hash.to_uppercase())
        }
        _ => format!("{version}-{pre_release}"),
    }
}

/// Strip one leading 'v' or 'V'
#[must_use]
pub fn strip_leading_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn increment_patch(version: &str) -> String {
    PATCH_PATTERN
        .replace(version, |caps: &regex::Captures| match caps[2].parse::<u64>() {
            Ok(patch) => format!("{}{}", &caps[1], patch + 1),
            Err(_) => caps[0].to_string(),
        })
        .to_string()
}
