use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};

/// Expand glob patterns relative to `root` into the regular files they match
///
/// Paths that vanish or cannot be read while expanding are skipped with a debug log.
///
/// # Errors
/// Returns error if a pattern is not a valid glob.
pub fn glob_files(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files = vec![];
    for pattern in patterns {
        let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
        let paths =
            glob_with(&full_pattern, options).context(format!("Invalid glob pattern: {pattern}"))?;
        for path in paths {
            match path {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => log::debug!("Skipping unreadable path while expanding {pattern}: {e}"),
            }
        }
    }
    Ok(files)
}
