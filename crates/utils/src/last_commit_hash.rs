use std::path::Path;

use anyhow::{Context, Result};

const ABBREVIATED_HASH_LEN: usize = 7;

/// Abbreviated hash of the commit HEAD points to, or `None` if the repository or HEAD
/// cannot be resolved
pub fn last_commit_hash(git_dir: &Path) -> Option<String> {
    match resolve_head(git_dir) {
        Ok(hash) => Some(hash),
        Err(e) => {
            log::debug!("Error getting git information: {e:#}");
            None
        }
    }
}

fn resolve_head(git_dir: &Path) -> Result<String> {
    if !git_dir.exists() {
        anyhow::bail!("Git repository not found at {}", git_dir.display());
    }
    let repo = gix::open(git_dir).context("Failed to open git repository")?;
    let head = repo.head_id().context("Could not resolve HEAD")?;
    Ok(head.to_hex_with_len(ABBREVIATED_HASH_LEN).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(path: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[test]
    fn test_last_commit_hash_missing_repository() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(last_commit_hash(&temp_dir.path().join(".git")), None);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_last_commit_hash_unborn_head() {
        let temp_dir = TempDir::new().unwrap();
        git(temp_dir.path(), &["init", "-b", "main"]);
        assert_eq!(last_commit_hash(&temp_dir.path().join(".git")), None);
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_last_commit_hash_matches_git() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();
        git(path, &["init", "-b", "main"]);
        git(path, &["config", "user.email", "test@test.com"]);
        git(path, &["config", "user.name", "Test"]);
        std::fs::write(path.join("build.gradle.kts"), "version = \"1.0.0\"").unwrap();
        git(path, &["add", "."]);
        git(path, &["commit", "-m", "Initial commit"]);

        let expected = git(path, &["rev-parse", "--short=7", "HEAD"]);
        let hash = last_commit_hash(&path.join(".git")).unwrap();
        assert_eq!(hash.len(), 7);
        assert_eq!(hash, expected);
        temp_dir.close().unwrap();
    }
}
