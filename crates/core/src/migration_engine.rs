use thiserror::Error;

use crate::{MigrateOutcome, MigrationRunConfig};

/// Failure reported by the migration engine (connectivity, validation, checksum mismatch,
/// clean-disabled violation, ...). Displays the engine's message untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The seam to the external tool that applies migrations to a live database.
///
/// Implementations are either compiled into the host or provided by a driver library loaded
/// for a single run. `migrate` is called exactly once per run and blocks until the engine is done.
pub trait MigrationEngine: std::fmt::Debug {
    /// Short identifier for logging
    fn name(&self) -> &str;

    /// # Errors
    /// Returns the engine's own error when the run fails.
    fn migrate(&self, config: &MigrationRunConfig) -> Result<MigrateOutcome, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_message_is_verbatim() {
        let error = EngineError::new("Validate failed: Migration checksum mismatch for migration version 2");
        assert_eq!(
            error.to_string(),
            "Validate failed: Migration checksum mismatch for migration version 2"
        );
    }
}
