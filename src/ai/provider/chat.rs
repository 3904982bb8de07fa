//! OpenAI-compatible Chat Completions Provider
//!
//! Serves both configured endpoints (xAI for content, OpenRouter for
//! analysis). Requests carry a single user message; the reply text is
//! returned as-is, JSON extraction happens in the feature layer.

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{LlmProvider, LlmResponse, ProviderConfig, TextStream, decode_sse_stream};
use crate::constants::network;
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, MasteryError, Result};

/// Chat completions client with secure API key handling
pub struct ChatCompletionsProvider {
    provider: String,
    /// Never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    extra_headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ChatCompletionsProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            MasteryError::Config(format!(
                "{} API key not found. Set it in config or via the provider's env var",
                config.provider
            ))
        })?;

        // Idle-read bound only; a streamed lesson outlives any total timeout
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .read_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LlmError::with_provider(
                    ErrorCategory::Unknown,
                    format!("Failed to create HTTP client: {}", e),
                    &config.provider,
                )
            })?;

        Ok(Self {
            provider: config.provider,
            api_key: SecretString::from(api_key),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            extra_headers: config.extra_headers,
            client,
        })
    }

    fn build_request(&self, prompt: &str, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: stream.then_some(true),
        }
    }

    /// POST the request and fail on any non-success status
    async fn send(&self, request: &ChatCompletionRequest) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.api_base);

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request);
        for (name, value) in &self.extra_headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_reqwest(&e, &self.provider))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("[{}] API error ({}): {}", self.provider, status, body);
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("{} API error: {}", self.provider, body),
                &self.provider,
            )
            .into());
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        info!(
            "Generating with {} (model: {}, temperature: {})",
            self.provider, self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, false);
        let response = self.send(&request).await?;

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Failed to decode response body: {}", e),
                &self.provider,
            )
        })?;

        if let Some(usage) = &body.usage {
            debug!(
                "[{}] tokens: {} prompt, {} completion",
                self.provider, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::ParseError,
                    "No content in response",
                    &self.provider,
                )
            })?;

        info!(
            "[{}] received {} chars in {}ms",
            self.provider,
            content.len(),
            start_time.elapsed().as_millis()
        );

        Ok(LlmResponse::new(content))
    }

    async fn stream(&self, prompt: &str) -> Result<TextStream> {
        info!("Streaming with {} (model: {})", self.provider, self.model);

        let request = self.build_request(prompt, true);
        let response = self.send(&request).await?;

        let provider = self.provider.clone();
        let bytes = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| MasteryError::from(ErrorClassifier::classify_reqwest(&e, &provider)))
            })
            .boxed();

        Ok(decode_sse_stream(bytes, self.provider.clone()))
    }

    fn name(&self) -> &str {
        &self.provider
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}
