//! Database migration orchestration.
//!
//! Three stages, run in order by [`MigrationPipeline`]:
//! - [`Assimilator`] merges common migrations with per-database overrides,
//! - [`invalidate_migrations`] fingerprints every input that can affect the database,
//! - [`MigrationExecutor`] runs the engine once with locations resolved for the target database.

pub mod assimilate;
pub mod driver;
pub mod error;
pub mod executor;
pub mod invalidate;
mod jdbc_prefix;
mod locations;
pub mod pipeline;

pub use assimilate::{
    AssimilationReport, Assimilator, MigrationPool, MigrationSource, copy_assimilated,
};
pub use driver::{ANY_PREFIX, DriverError, DriverLoader, EngineFactory, EngineRegistry};
pub use error::MigrateError;
pub use executor::MigrationExecutor;
pub use invalidate::{
    InvalidationFingerprint, TrackedCategory, TrackedInputs, invalidate_migrations,
};
pub use jdbc_prefix::extract_jdbc_prefix;
pub use locations::resolve_locations;
pub use pipeline::{MigrationPipeline, PipelineOutcome};
