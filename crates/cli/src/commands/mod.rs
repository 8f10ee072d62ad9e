mod assimilate;
mod config;
mod init;
mod invalidate;
mod metadata;
mod migrate;
mod version;

pub use assimilate::AssimilateArgs;
pub use assimilate::handle_assimilate;
pub use config::ConfigArgs;
pub use config::handle_config;
pub use init::InitArgs;
pub use init::handle_init;
pub use invalidate::InvalidateArgs;
pub use invalidate::handle_invalidate;
pub use metadata::MetadataArgs;
pub use metadata::handle_metadata;
pub use migrate::MigrateArgs;
pub use migrate::handle_migrate;
pub use version::VersionArgs;
pub use version::handle_version;
