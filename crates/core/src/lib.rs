//! # keystone-core
//!
//! Core types shared by every keystone crate: the configuration model, the fixed build
//! layout, the resolved migration run parameters and the [`MigrationEngine`] seam.

pub mod config;
pub mod layout;
pub mod migrate_outcome;
pub mod migration_config;
pub mod migration_engine;
pub mod project_metadata;
pub mod run_config;
pub mod tracking_config;
pub mod versioning_config;

// Re-export for convenience
pub use config::{Config, ProjectConfig, SubprojectConfig};
pub use layout::BuildLayout;
pub use migrate_outcome::MigrateOutcome;
pub use migration_config::MigrationConfig;
pub use migration_engine::{EngineError, MigrationEngine};
pub use project_metadata::ProjectMetadata;
pub use run_config::MigrationRunConfig;
pub use tracking_config::{MAIN_PACKAGE_PATH_TOKEN, TrackingConfig};
pub use versioning_config::VersioningConfig;
