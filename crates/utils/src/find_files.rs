use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Find regular files below `root` whose extension satisfies `matches_extension`
///
/// No ignore files, hidden-file rules or other filters apply: every file on disk is a
/// candidate. `max_depth` of `Some(1)` restricts the search to direct children of `root`.
/// Results are in file-name order within each directory.
///
/// # Errors
/// Returns error if a directory below `root` cannot be read.
pub fn find_files(
    root: &Path,
    max_depth: Option<usize>,
    matches_extension: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = vec![];
    for entry in walker {
        let entry = entry.context(format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(&matches_extension)
        {
            files.push(path);
        }
    }
    Ok(files)
}

/// Immediate subdirectories of `root`, in name order
///
/// # Errors
/// Returns error if `root` cannot be read.
pub fn child_directories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = std::fs::read_dir(root)
        .context(format!("Failed to read {}", root.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}
