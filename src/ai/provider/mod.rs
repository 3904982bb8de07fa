//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait for chat completion calls, either as one
//! complete reply or as a stream of text deltas.
//!
//! ## Modules
//!
//! - `chat`: OpenAI-compatible `/chat/completions` client (xAI, OpenRouter)
//! - `sse`: server-sent-event decoding of streamed completions

mod chat;
#[cfg(test)]
pub(crate) mod mock;
mod sse;

pub use chat::ChatCompletionsProvider;
pub use sse::{SseDecoder, SseEvent, decode_sse_stream};

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

use crate::types::Result;

/// Complete reply of a single-shot call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// Raw text of the first choice
    pub content: String,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Incremental text deltas of a streamed completion.
///
/// Ends after the `[DONE]` frame; an `Err` item is terminal.
pub type TextStream = BoxStream<'static, Result<String>>;

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Runtime settings for one chat completions endpoint
#[derive(Clone)]
pub struct ProviderConfig {
    /// Provider label: "xai", "openrouter", ...
    pub provider: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
    /// Additional headers sent with every request
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderConfig {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Single-shot completion of a user prompt
    async fn complete(&self, prompt: &str) -> Result<LlmResponse>;

    /// Streamed completion of a user prompt.
    ///
    /// A non-success HTTP status fails here, before any delta is produced.
    async fn stream(&self, prompt: &str) -> Result<TextStream>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: ProviderConfig) -> Result<SharedProvider> {
    Ok(Arc::new(ChatCompletionsProvider::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_holds_reply_text() {
        let response = LlmResponse::new("{\"quiz\": []}");
        assert_eq!(response.content, "{\"quiz\": []}");
    }

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let config = ProviderConfig {
            provider: "xai".into(),
            api_base: "https://api.x.ai/v1".into(),
            model: "grok-3".into(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: 60,
            api_key: Some("xai-secret".into()),
            extra_headers: vec![],
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("xai-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
