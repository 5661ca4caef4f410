//! API key resolution.
//!
//! Order: environment variable, then the configured key file, then the key
//! stored in user settings. Empty values count as absent.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use postcraft_core::config::LlmConfig;
use postcraft_core::{Credential, UserSettings};
use tracing::{debug, warn};

use crate::error::AppError;

/// Where the active key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Named environment variable.
    Environment(String),
    /// Key file.
    File(PathBuf),
    /// Stored user settings.
    Settings,
    /// No key anywhere.
    Missing,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment(var) => write!(f, "environment variable {var}"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Settings => f.write_str("saved settings"),
            Self::Missing => f.write_str("not configured"),
        }
    }
}

/// A key together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    /// The key. Empty when the source is [`CredentialSource::Missing`].
    pub credential: Credential,
    /// Where it came from.
    pub source: CredentialSource,
}

/// Resolve the key from the process environment, key file and settings.
///
/// # Errors
/// Returns [`AppError::CredentialFile`] if the key file exists but cannot
/// be read.
pub fn resolve_credential(config: &LlmConfig, settings: &UserSettings) -> Result<ResolvedCredential, AppError> {
    resolve_with(config, settings, |name| std::env::var(name).ok())
}

/// [`resolve_credential`] with an injectable environment lookup.
///
/// # Errors
/// See [`resolve_credential`].
pub fn resolve_with<F>(config: &LlmConfig, settings: &UserSettings, env: F) -> Result<ResolvedCredential, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = config.api_key_env.trim();
    if !var.is_empty() {
        let credential = Credential::new(env(var).unwrap_or_default());
        if !credential.is_empty() {
            debug!(var, "API key taken from environment");
            return Ok(ResolvedCredential {
                credential,
                source: CredentialSource::Environment(var.to_string()),
            });
        }
    }

    if let Some(path) = &config.api_key_file {
        if let Some(credential) = read_key_file(path)? {
            debug!(path = %path.display(), "API key taken from key file");
            return Ok(ResolvedCredential {
                credential,
                source: CredentialSource::File(path.clone()),
            });
        }
    }

    if !settings.api_key.is_empty() {
        return Ok(ResolvedCredential {
            credential: settings.api_key.clone(),
            source: CredentialSource::Settings,
        });
    }

    Ok(ResolvedCredential {
        credential: Credential::default(),
        source: CredentialSource::Missing,
    })
}

/// First line of the key file. A missing file is skipped with a warning.
fn read_key_file(path: &Path) -> Result<Option<Credential>, AppError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let credential = Credential::new(content.lines().next().unwrap_or_default());
            Ok((!credential.is_empty()).then_some(credential))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Configured API key file does not exist");
            Ok(None)
        }
        Err(source) => Err(AppError::CredentialFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(key: &str) -> UserSettings {
        UserSettings {
            api_key: Credential::new(key),
            ..UserSettings::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn environment_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("key");
        std::fs::write(&file, "sk-from-file-000000\n").expect("write");
        let config = LlmConfig {
            api_key_file: Some(file),
            ..LlmConfig::default()
        };

        let resolved = resolve_with(&config, &settings_with_key("sk-from-settings"), |name| {
            (name == "POSTCRAFT_API_KEY").then(|| "  sk-from-env-123456 ".to_string())
        })
        .expect("resolve");
        assert_eq!(resolved.credential.expose(), "sk-from-env-123456");
        assert_eq!(resolved.source, CredentialSource::Environment("POSTCRAFT_API_KEY".into()));
    }

    #[test]
    fn file_beats_settings_and_reads_first_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("key");
        std::fs::write(&file, "  sk-from-file-000000  \nsecond line\n").expect("write");
        let config = LlmConfig {
            api_key_file: Some(file.clone()),
            ..LlmConfig::default()
        };

        let resolved = resolve_with(&config, &settings_with_key("sk-from-settings"), |_| Some("   ".into()))
            .expect("resolve");
        assert_eq!(resolved.credential.expose(), "sk-from-file-000000");
        assert_eq!(resolved.source, CredentialSource::File(file));
    }

    #[test]
    fn settings_are_last_resort() {
        let config = LlmConfig {
            api_key_file: Some(PathBuf::from("/nonexistent/postcraft/key")),
            ..LlmConfig::default()
        };
        let resolved = resolve_with(&config, &settings_with_key("sk-from-settings"), no_env).expect("resolve");
        assert_eq!(resolved.credential.expose(), "sk-from-settings");
        assert_eq!(resolved.source, CredentialSource::Settings);
    }

    #[test]
    fn nothing_configured_is_missing() {
        let resolved = resolve_with(&LlmConfig::default(), &UserSettings::default(), no_env).expect("resolve");
        assert!(resolved.credential.is_empty());
        assert_eq!(resolved.source, CredentialSource::Missing);
        assert_eq!(resolved.source.to_string(), "not configured");
    }

    #[test]
    fn empty_key_file_falls_through() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("key");
        std::fs::write(&file, "\n").expect("write");
        let config = LlmConfig {
            api_key_file: Some(file),
            ..LlmConfig::default()
        };
        let resolved = resolve_with(&config, &UserSettings::default(), no_env).expect("resolve");
        assert_eq!(resolved.source, CredentialSource::Missing);
    }

    #[test]
    fn unreadable_key_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LlmConfig {
            api_key_file: Some(dir.path().to_path_buf()),
            ..LlmConfig::default()
        };
        let err = resolve_with(&config, &UserSettings::default(), no_env).expect_err("directory is not a file");
        assert!(matches!(err, AppError::CredentialFile { .. }));
    }
}
