//! # postcraft-app
//!
//! Ties storage, templates and the LLM client together behind
//! [`ContentStudio`], the service the `postcraft` binary drives.

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod credentials;
pub mod error;
pub mod studio;
pub mod telemetry;

pub use error::AppError;
pub use studio::{ContentStudio, GeneratedContent, GenerationRequest, GenerationSource, ProviderFactory};
