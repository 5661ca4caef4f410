//! LLM Client: blocking chat completions against an OpenAI-compatible API.

use std::time::{Duration, Instant};

use postcraft_core::config::LlmConfig;
use postcraft_core::Credential;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::error::RemoteServiceError;
use crate::types::{ChatRequest, ChatResponse, LlmRequest, LlmResponse};

/// Anything that can turn a prompt into completion text.
///
/// [`LlmClient`] is the real implementation; tests substitute scripted
/// providers.
pub trait CompletionProvider {
    /// Run one completion.
    ///
    /// # Errors
    /// Returns [`RemoteServiceError`] on transport failure, non-success
    /// status, malformed body, or when no provider is configured.
    fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RemoteServiceError>;

    /// Whether calls can succeed at all. `false` means disabled mode.
    fn is_available(&self) -> bool;
}

/// Provider backend.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// OpenAI-compatible API (OpenRouter, OpenAI, local gateways).
    OpenAiCompatible {
        /// Base URL; `/chat/completions` is appended.
        base_url: String,
        /// Bearer credential.
        api_key: Credential,
    },
    /// No LLM available. Every call fails with
    /// [`RemoteServiceError::NotConfigured`].
    None,
}

/// Blocking client for the configured provider.
pub struct LlmClient {
    provider: LlmProvider,
    http: Option<Client>,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Create a client. `timeout` overrides the HTTP client's default.
    ///
    /// # Errors
    /// Returns [`RemoteServiceError::Request`] if the HTTP client cannot be
    /// built (e.g. TLS backend initialisation failed).
    pub fn new(provider: LlmProvider, timeout: Option<Duration>) -> Result<Self, RemoteServiceError> {
        let http = match provider {
            LlmProvider::None => None,
            LlmProvider::OpenAiCompatible { .. } => {
                let mut builder = Client::builder();
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                Some(builder.build()?)
            }
        };
        Ok(Self { provider, http })
    }

    /// Create a client with no backend.
    #[must_use]
    pub fn none() -> Self {
        Self {
            provider: LlmProvider::None,
            http: None,
        }
    }

    /// Client for the configured endpoint, or a disabled one when the
    /// credential is empty.
    ///
    /// # Errors
    /// See [`LlmClient::new`].
    pub fn from_config(config: &LlmConfig, api_key: Credential) -> Result<Self, RemoteServiceError> {
        if api_key.is_empty() {
            info!("No API key configured, LLM generation disabled");
            return Ok(Self::none());
        }
        info!(base_url = %config.base_url, model = %config.model, api_key = %api_key, "LLM client configured");
        Self::new(
            LlmProvider::OpenAiCompatible {
                base_url: config.base_url.clone(),
                api_key,
            },
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// The configured provider.
    #[must_use]
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    fn generate_openai(
        http: &Client,
        base_url: &str,
        api_key: &Credential,
        request: &LlmRequest,
    ) -> Result<LlmResponse, RemoteServiceError> {
        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let body = ChatRequest::from_request(request);

        let start = Instant::now();
        let result = http
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(&body)
            .send();

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    warn!(%url, "LLM request timed out");
                } else {
                    warn!(%url, error = %e, "LLM request failed");
                }
                return Err(e.into());
            }
        };

        let status = resp.status();
        let text = resp.text()?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        if !status.is_success() {
            warn!(status = status.as_u16(), latency_ms, "LLM service returned an error status");
            return Err(RemoteServiceError::status(status.as_u16(), &text));
        }

        let envelope: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteServiceError::MalformedResponse(format!("invalid JSON envelope: {e}")))?;
        let tokens_generated = envelope.usage.as_ref().and_then(|u| u.completion_tokens);
        let model = envelope.model.clone().unwrap_or_else(|| request.model.clone());
        let text = envelope.into_content().ok_or_else(|| {
            RemoteServiceError::MalformedResponse("missing choices[0].message.content".into())
        })?;

        debug!(
            %model,
            latency_ms,
            tokens = tokens_generated,
            chars = text.len(),
            "LLM completion received"
        );

        Ok(LlmResponse {
            text,
            tokens_generated,
            latency_ms,
            model,
        })
    }
}

impl CompletionProvider for LlmClient {
    fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RemoteServiceError> {
        match (&self.provider, &self.http) {
            (LlmProvider::OpenAiCompatible { base_url, api_key }, Some(http)) => {
                Self::generate_openai(http, base_url, api_key, request)
            }
            _ => Err(RemoteServiceError::NotConfigured),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_client_refuses() {
        let client = LlmClient::none();
        assert!(!client.is_available());
        let err = client
            .complete(&LlmRequest::new("hi", "m", 16))
            .expect_err("no provider");
        assert!(matches!(err, RemoteServiceError::NotConfigured));
    }

    #[test]
    fn empty_credential_means_disabled() {
        let client = LlmClient::from_config(&LlmConfig::default(), Credential::new("   ")).expect("build");
        assert!(!client.is_available());
        assert!(matches!(client.provider(), LlmProvider::None));
    }

    #[test]
    fn debug_output_masks_key() {
        let client = LlmClient::from_config(
            &LlmConfig::default(),
            Credential::new("sk-or-v1-0123456789abcdef"),
        )
        .expect("build");
        assert!(client.is_available());
        let debug = format!("{client:?}");
        assert!(!debug.contains("0123456789abcdef"), "{debug}");
    }
}
