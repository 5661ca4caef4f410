//! Request and response types, plus the chat completions wire format.

use serde::{Deserialize, Serialize};

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// Fully rendered prompt, sent as one user message.
    pub prompt: String,
    /// Model identifier, e.g. `deepseek/deepseek-chat-v3-0324`.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature. Provider default when `None`.
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Request with the provider's default temperature.
    #[must_use]
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens,
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A completion returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// The generated text, unmodified.
    pub text: String,
    /// Completion tokens, when the service reports usage.
    pub tokens_generated: Option<u32>,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u64,
    /// Model that answered (as reported by the service, else as requested).
    pub model: String,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn from_request(request: &'a LlmRequest) -> Self {
        Self {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatUsage {
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}

impl ChatResponse {
    /// Text of the first choice, if there is one.
    pub(crate) fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let req = LlmRequest::new("Hi", "m", 64);
        let json = serde_json::to_value(ChatRequest::from_request(&req)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "Hi"}],
                "max_tokens": 64,
            })
        );

        let req = req.with_temperature(Some(0.5));
        let json = serde_json::to_value(ChatRequest::from_request(&req)).expect("serialize");
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn envelope_content_is_extracted() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}],"usage":{"completion_tokens":3}}"#,
        )
        .expect("parse");
        assert_eq!(resp.usage.as_ref().and_then(|u| u.completion_tokens), Some(3));
        assert_eq!(resp.into_content().as_deref(), Some("Hello"));
    }

    #[test]
    fn empty_choices_have_no_content() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("parse");
        assert!(resp.into_content().is_none());
    }
}
