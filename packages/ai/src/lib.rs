#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Generative suggestion adapter with LLM provider abstraction.
//!
//! Supports Anthropic Claude and `OpenAI` via a common single-prompt
//! completion trait. The suggestion adapter asks the provider for travel
//! suggestions matching a query, parses free-text or JSON replies into
//! canonical suggestion values, and degrades to a small static fallback
//! when no provider is configured. Provider failures never escape this
//! crate's adapter: they are logged and turn into an empty result.

pub mod providers;
pub mod suggest;

use thiserror::Error;

/// Errors that can occur while talking to an LLM provider.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the provider failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error (auth, rate limit, malformed body).
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },
}
