//! Configuration for postcraft.
//!
//! Maps to `postcraft.toml`. Every field has a default, so an empty file (or
//! no file at all) is a valid configuration. Environment variables prefixed
//! with `POSTCRAFT__` override file values, e.g. `POSTCRAFT__LLM__MODEL`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "POSTCRAFT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcraftConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// LLM endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Local database settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl PostcraftConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Layered load: defaults, then the optional TOML file, then
    /// `POSTCRAFT__SECTION__KEY` environment variables. The result is
    /// validated before it is returned.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if a source cannot be read or
    /// deserialized, or [`ConfigError::Invalid`] if validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Load(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: Self = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values that would fail later in a confusing way.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.base_url must not be empty".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Invalid("llm.max_tokens must be positive".into()));
        }
        if let Some(t) = self.llm.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "llm.temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "general.log_format must be \"pretty\" or \"json\", got \"{}\"",
                self.general.log_format
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// LLM endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (`/chat/completions` is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on generated tokens per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature. Provider default when unset.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// HTTP timeout override in seconds. HTTP client default when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// File holding the API key (first line, trimmed).
    #[serde(default)]
    pub api_key_file: Option<PathBuf>,
    /// Directory of TOML prompt overrides.
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            request_timeout_secs: None,
            api_key_env: default_api_key_env(),
            api_key_file: None,
            prompts_dir: None,
        }
    }
}

/// Local database configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file path.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Use WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_base_url() -> String { "https://openrouter.ai/api/v1".to_string() }
fn default_model() -> String { "deepseek/deepseek-chat-v3-0324".to_string() }
fn default_max_tokens() -> u32 { 1024 }
fn default_api_key_env() -> String { "POSTCRAFT_API_KEY".to_string() }
fn default_database_path() -> PathBuf { PathBuf::from("social_media_posts.db") }
