use keystone_core::EngineError;
use thiserror::Error;

use crate::DriverError;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Invalid migration configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl MigrateError {
    /// The engine's own error, when the engine itself failed
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}
