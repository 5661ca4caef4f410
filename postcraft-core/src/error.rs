//! Error types for the postcraft core library.

use std::path::PathBuf;

use thiserror::Error;

/// Local storage failure.
///
/// Surfaced to the user as a failed save; the caller still owns the input
/// and may retry.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The database could not be opened or its schema created.
    #[error("Failed to open post database at {path}: {source}")]
    Open {
        /// Database file that failed to open.
        path: PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite error during a query.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored column could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    /// Whether this failure happened while initializing the store.
    ///
    /// Initialization failures abort startup; everything else is reported
    /// and the action can be retried.
    #[must_use]
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Configuration loading or validation failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// The configuration was read but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A referenced file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias for storage operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
