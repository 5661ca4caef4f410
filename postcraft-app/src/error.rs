//! Application error type.

use std::path::PathBuf;

use postcraft_core::{ConfigError, PersistenceError};
use postcraft_llm::{PromptError, RemoteServiceError};
use thiserror::Error;

/// Anything a [`crate::ContentStudio`] operation can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// The LLM call failed.
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),

    /// Local storage failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Prompt overrides could not be loaded.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The configured API key file exists but cannot be read.
    #[error("failed to read API key file {path}: {source}")]
    CredentialFile {
        /// Configured path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The request itself is unusable (e.g. blank topic).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Whether repeating the same action may succeed.
    ///
    /// True for remote failures (except a missing provider) and for storage
    /// failures after startup.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(e) => !matches!(e, RemoteServiceError::NotConfigured),
            Self::Persistence(e) => !e.is_initialization(),
            Self::Config(_) | Self::Prompt(_) | Self::CredentialFile { .. } | Self::InvalidInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(AppError::from(RemoteServiceError::status(503, "busy")).is_retryable());
        assert!(!AppError::from(RemoteServiceError::NotConfigured).is_retryable());
        assert!(AppError::from(PersistenceError::Serialization("bad".into())).is_retryable());
        assert!(!AppError::InvalidInput("empty topic".into()).is_retryable());
    }

    #[test]
    fn remote_errors_display_transparently() {
        let err = AppError::from(RemoteServiceError::status(429, "rate limited"));
        assert_eq!(err.to_string(), "LLM service returned HTTP 429: rate limited");
    }
}
