//! Scripted in-process provider for tests

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{LlmProvider, LlmResponse, SharedProvider, TextStream};
use crate::types::{ErrorCategory, LlmError, MasteryError, Result};

/// One scripted stream item
#[derive(Debug, Clone)]
pub enum Chunk {
    Text(String),
    /// Transport failure at this point of the stream
    Fail(u16),
}

#[derive(Debug, Default)]
pub struct MockProvider {
    reply: String,
    chunks: Vec<Chunk>,
    /// Fail before any byte is produced
    open_status: Option<u16>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Single-shot reply for `complete`
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }

    /// Stream the given text pieces
    pub fn streaming<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: pieces.into_iter().map(|p| Chunk::Text(p.into())).collect(),
            ..Default::default()
        }
    }

    /// Stream `text` in pieces of `size` chars
    pub fn streaming_text(text: &str, size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::streaming(chars.chunks(size.max(1)).map(|c| c.iter().collect::<String>()))
    }

    pub fn then_fail(mut self, status: u16) -> Self {
        self.chunks.push(Chunk::Fail(status));
        self
    }

    pub fn failing_to_open(status: u16) -> Self {
        Self {
            open_status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn shared(self) -> (SharedProvider, Arc<MockProvider>) {
        let mock = Arc::new(self);
        let provider: SharedProvider = mock.clone();
        (provider, mock)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str) {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
    }

    fn error(status: u16) -> MasteryError {
        LlmError::with_provider(ErrorCategory::Transient, format!("mock HTTP {}", status), "mock")
            .status(status)
            .into()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        self.record(prompt);
        if let Some(status) = self.open_status {
            return Err(Self::error(status));
        }
        Ok(LlmResponse::new(self.reply.clone()))
    }

    async fn stream(&self, prompt: &str) -> Result<TextStream> {
        self.record(prompt);
        if let Some(status) = self.open_status {
            return Err(Self::error(status));
        }

        let delay = self.delay;
        let mut items = self.chunks.clone();
        if let Some(fail) = items.iter().position(|c| matches!(c, Chunk::Fail(_))) {
            items.truncate(fail + 1);
        }
        Ok(stream::iter(items)
            .then(move |chunk| async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                match chunk {
                    Chunk::Text(text) => Ok(text),
                    Chunk::Fail(status) => Err(Self::error(status)),
                }
            })
            .boxed())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
