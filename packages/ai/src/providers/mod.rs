//! LLM provider abstraction and implementations.
//!
//! Supports Anthropic Claude and `OpenAI` via a common trait.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use crate::AiError;

/// Upper bound on a single provider request. A slow provider degrades to
/// an empty suggestion list instead of stalling the response.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Trait for single-prompt completion providers.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one prompt and returns the provider's text reply.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails, times out, or the
    /// provider replies with an error.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 2. `OPENAI_API_KEY` set -> `OpenAI`
///
/// Returns `None` when no credentials are configured, or when the
/// explicitly requested provider is missing its key; the caller falls
/// back to static suggestions rather than failing.
#[must_use]
pub fn create_provider_from_env() -> Option<Box<dyn CompletionProvider>> {
    let provider = match std::env::var("AI_PROVIDER") {
        Ok(explicit) => explicit,
        Err(_) => detect_provider()?,
    };

    match provider.to_lowercase().as_str() {
        "anthropic" | "claude" => {
            let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") else {
                log::error!("AI_PROVIDER=anthropic but ANTHROPIC_API_KEY is not set");
                return None;
            };
            let model = std::env::var("AI_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string());
            Some(Box::new(anthropic::AnthropicProvider::new(api_key, model)))
        }
        "openai" | "gpt" => {
            let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
                log::error!("AI_PROVIDER=openai but OPENAI_API_KEY is not set");
                return None;
            };
            let model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
            Some(Box::new(openai::OpenAiProvider::new(api_key, model)))
        }
        other => {
            log::error!("Unknown AI provider: {other}. Use 'anthropic' or 'openai'.");
            None
        }
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns `None` when no credentials are present.
fn detect_provider() -> Option<String> {
    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return Some("anthropic".to_string());
    }

    if std::env::var("OPENAI_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY found)");
        return Some("openai".to_string());
    }

    log::warn!(
        "No AI credentials detected. Set ANTHROPIC_API_KEY or OPENAI_API_KEY \
         (or AI_PROVIDER explicitly) to enable generative suggestions. \
         Falling back to static suggestions."
    );

    None
}
