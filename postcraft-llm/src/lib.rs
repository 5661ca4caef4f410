//! # postcraft-llm: LLM access for postcraft
//!
//! Sends prompts to an OpenAI-compatible chat completions endpoint
//! (OpenRouter by default) and returns the raw completion text.
//!
//!   - **Client**: blocking HTTP, one request per call, no retries. Errors
//!     surface to the caller, which decides whether to show or fall back.
//!   - **Prompts**: built-in templates for the four generation requests,
//!     optionally overridden by TOML files on disk.
//!
//! ```text
//! GenerationParams ─► PromptEngine::render ─► LlmRequest ─► LlmClient ─► raw text
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{CompletionProvider, LlmClient, LlmProvider};
pub use error::{PromptError, RemoteServiceError};
pub use prompt::{GenerationParams, PromptEngine, PromptId};
pub use types::{LlmRequest, LlmResponse};
