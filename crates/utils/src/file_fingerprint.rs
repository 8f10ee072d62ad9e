//! Content identity of a single file, used for change detection.

use std::{
    fmt::Display,
    fs::File,
    io,
    path::Path,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Either a verified content hash or, when the file could not be hashed, a weaker
/// identity built from its modification time. A `LastModified` identity means
/// "assumed changed", never "verified unchanged".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileIdentity {
    /// Lowercase hex SHA-256 of the file's bytes
    Content(String),
    /// Epoch milliseconds of the last modification, 0 when unknown
    LastModified { millis: i64, cause: String },
}

impl FileIdentity {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Content(_))
    }
}

impl Display for FileIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content(hash) => write!(f, "{hash}"),
            Self::LastModified { millis, .. } => write!(f, "lastmod-{millis}"),
        }
    }
}

/// Hash a file's content, degrading to its modification time if it cannot be read
pub fn fingerprint_file(path: &Path) -> FileIdentity {
    match content_hash(path) {
        Ok(hash) => FileIdentity::Content(hash),
        Err(e) => FileIdentity::LastModified {
            millis: last_modified_millis(path),
            cause: format!("{e:#}"),
        },
    }
}

/// Compute the SHA-256 checksum of a file's bytes
///
/// # Errors
/// Returns error if the file cannot be opened or read.
pub fn content_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).context(format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn last_modified_millis(path: &Path) -> i64 {
    path.metadata()
        .and_then(|metadata| metadata.modified())
        .map(|modified| DateTime::<Utc>::from(modified).timestamp_millis())
        .unwrap_or(0)
}
