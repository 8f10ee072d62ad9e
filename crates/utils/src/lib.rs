mod compute_version;
mod file_fingerprint;
mod find_files;
mod get_keystone_config;
mod glob_files;
mod last_commit_hash;

pub use compute_version::{VersionOverrides, compute_version, strip_leading_v};
pub use file_fingerprint::{FileIdentity, content_hash, fingerprint_file};
pub use find_files::{child_directories, find_files};
pub use get_keystone_config::get_keystone_config;
pub use glob_files::glob_files;
pub use last_commit_hash::last_commit_hash;
