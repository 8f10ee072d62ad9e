use std::path::Path;

use keystone_core::MigrationConfig;

use crate::extract_jdbc_prefix;

const FILESYSTEM_SCHEME: &str = "filesystem:";

/// Compute the search locations for a run
///
/// With RDBMS-specific migrations enabled and a recognizable JDBC URL, every
/// `filesystem:` location is replaced by the assimilated directory of the URL's database
/// product; other schemes (e.g. `classpath:`) are kept in order. Otherwise the configured
/// locations are returned unchanged.
#[must_use]
pub fn resolve_locations(config: &MigrationConfig, assimilated_root: &Path) -> Vec<String> {
    if !config.enable_rdbms_specific_migrations {
        return config.locations.clone();
    }

    log::debug!("Attempting to use RDBMS specific migrations");
    let Some(prefix) = config.url.as_deref().and_then(extract_jdbc_prefix) else {
        log::debug!("No JDBC prefix in connection URL, using configured locations");
        return config.locations.clone();
    };
    log::debug!("Extracted JDBC prefix: {prefix}");

    config
        .locations
        .iter()
        .filter(|location| !is_filesystem_location(location))
        .cloned()
        .chain(std::iter::once(format!(
            "{FILESYSTEM_SCHEME}{}",
            assimilated_root.join(prefix).display()
        )))
        .collect()
}

fn is_filesystem_location(location: &str) -> bool {
    location
        .get(..FILESYSTEM_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(FILESYSTEM_SCHEME))
}
