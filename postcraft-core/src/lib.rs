//! # postcraft Core Library
//!
//! Everything postcraft needs that does not touch the network:
//!
//! - **Model:** [`PostDraft`], [`Post`], [`UserSettings`] and the
//!   [`Platform`] / [`Tone`] / [`ContentType`] label enumerations.
//! - **Parser:** splits a four-section LLM reply into a [`ParsedPackage`].
//! - **Storage:** the [`PostStore`] interface with an in-memory backend and
//!   a SQLite-backed one.
//! - **Templates:** rule-based generation used when no LLM is configured.
//! - **History:** filtering and usage statistics over saved posts.
//!
//! All operations are synchronous and single-threaded.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hashtags;
pub mod history;
pub mod ideas;
pub mod parser;
pub mod persistence;
pub mod platform_posts;
pub mod store;
pub mod templates;
pub mod types;

pub use config::PostcraftConfig;
pub use error::{ConfigError, PersistenceError};
pub use parser::{ParsedPackage, Section};
pub use persistence::SqliteStore;
pub use store::{InMemoryStore, PostStore};
pub use types::*;
