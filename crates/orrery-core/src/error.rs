//! Error types for generation, configuration, persistence and sync.

use thiserror::Error;

use crate::state::SystemId;

/// Errors raised while generating a star system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Planet count outside `1..=max_planets`
    #[error("planet count {requested} out of range: expected 1..={max}")]
    PlanetCountOutOfRange { requested: u32, max: u32 },

    #[error("invalid generation constants: {0}")]
    InvalidConstants(String),
}

/// Errors raised while reading generation constants
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

/// Errors reported by a [`SystemRepository`](crate::persistence::SystemRepository)
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("star system {0} not found")]
    NotFound(SystemId),

    /// Backing store cannot be reached at all
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Errors raised by the [`StateSynchronizer`](crate::synchronizer::StateSynchronizer)
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("star system {0} not found")]
    NotFound(SystemId),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Persistence(PersistenceError),
}

impl From<PersistenceError> for SyncError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::NotFound(id) => SyncError::NotFound(id),
            other => SyncError::Persistence(other),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
