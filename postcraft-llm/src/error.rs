//! LLM error types.

use std::path::PathBuf;

use thiserror::Error;

/// Longest HTTP error body kept in [`RemoteServiceError::Status`].
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// Failure talking to the remote completion service.
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    /// Network or transport failure (DNS, connect, TLS, timeout).
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("LLM service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// A success status whose body is not a completion envelope.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    /// No credential, so the client runs in disabled mode.
    #[error("no LLM provider configured (set an API key)")]
    NotConfigured,
}

impl RemoteServiceError {
    /// Build a [`Self::Status`] error, truncating long bodies.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > MAX_ERROR_BODY_CHARS {
            let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            cut.push('…');
            cut
        } else {
            body.to_string()
        };
        Self::Status { status, body }
    }

    /// Whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Failure loading prompt overrides from disk.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The override directory does not exist or is not a directory.
    #[error("prompt directory not found: {0}")]
    NotADirectory(PathBuf),

    /// A prompt file could not be read.
    #[error("failed to read prompt file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A prompt file is not valid prompt TOML.
    #[error("failed to parse prompt file {path}: {message}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        let RemoteServiceError::Status { status, body } = RemoteServiceError::status(502, &body) else {
            panic!("expected status error");
        };
        assert_eq!(status, 502);
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 1);
    }

    #[test]
    fn short_bodies_are_kept() {
        let err = RemoteServiceError::status(401, " {\"error\":\"unauthorized\"} ");
        assert_eq!(err.to_string(), "LLM service returned HTTP 401: {\"error\":\"unauthorized\"}");
        assert!(!err.is_timeout());
    }
}
