//! Streaming Content State Machine
//!
//! ```text
//! Idle ──begin──▶ Generating ──(token)*──▶ Complete
//!                     │
//!                     ├──transport error──▶ Failed     (sections kept)
//!                     └──cancel───────────▶ Cancelled  (silent)
//! ```
//!
//! Every token is appended to the raw accumulator, the whole accumulator is
//! rescanned, and sections past the cursor are appended and reported. One
//! `ContentState` belongs to exactly one request.

use chrono::Utc;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::extractor::extract_sections;
use crate::ai::{PromptTemplates, SharedProvider, TextStream};
use crate::config::LearnerConfig;
use crate::types::{Content, ContentSection, Level, MasteryError, Result, StructuredContent, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Generating,
    Complete,
    Failed,
    Cancelled,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Cancelled)
    }
}

/// Notification sent to the consumer, synchronously, as state changes
#[derive(Debug)]
pub enum ContentUpdate<'a> {
    SectionAdded {
        index: usize,
        section: &'a ContentSection,
    },
    Completed {
        sections: usize,
    },
    Failed {
        error: &'a MasteryError,
        sections: usize,
    },
}

/// What the consumer should show for a state
#[derive(Debug)]
pub enum Rendering<'a> {
    /// Nothing yet
    Pending,
    /// Structured sections (possibly still growing)
    Sections(&'a [ContentSection]),
    /// Completed with zero sections: show raw text as markdown
    Markdown(&'a str),
    /// Terminal error; already-parsed sections stay visible
    Failed {
        sections: &'a [ContentSection],
        error: &'a MasteryError,
    },
}

/// Per-request accumulator, parsed sections and lifecycle
#[derive(Debug)]
pub struct ContentState {
    status: GenerationStatus,
    raw: String,
    structured: StructuredContent,
    /// Sections already yielded; never rewinds
    cursor: usize,
    error: Option<MasteryError>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentState {
    pub fn new() -> Self {
        Self {
            status: GenerationStatus::Idle,
            raw: String::new(),
            structured: StructuredContent::new(),
            cursor: 0,
            error: None,
        }
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn structured(&self) -> &StructuredContent {
        &self.structured
    }

    pub fn sections(&self) -> &[ContentSection] {
        self.structured.sections()
    }

    pub fn error(&self) -> Option<&MasteryError> {
        self.error.as_ref()
    }

    pub fn begin(&mut self) {
        if self.status == GenerationStatus::Idle {
            self.status = GenerationStatus::Generating;
        } else {
            warn!("begin() ignored in state {:?}", self.status);
        }
    }

    /// Append a token and return the sections it completed.
    ///
    /// Ignored unless generating.
    pub fn push_token(&mut self, token: &str) -> &[ContentSection] {
        if self.status != GenerationStatus::Generating {
            return &[];
        }

        self.raw.push_str(token);
        let discovered = extract_sections(&self.raw);
        let first_new = self.cursor;

        if discovered.len() > self.cursor {
            for section in discovered.into_iter().skip(self.cursor) {
                debug!("Section ready: [{}] {}", section.kind, section.title);
                self.structured.append(section);
            }
            self.cursor = self.structured.len();
        }

        &self.structured.sections()[first_new..]
    }

    pub fn complete(&mut self) {
        if self.status == GenerationStatus::Generating {
            self.status = GenerationStatus::Complete;
            if self.structured.is_empty() && !self.raw.trim().is_empty() {
                warn!("No sections parsed; falling back to raw markdown");
            }
        }
    }

    pub fn fail(&mut self, error: MasteryError) {
        if self.status == GenerationStatus::Generating {
            warn!(
                "Generation failed after {} section(s): {}",
                self.structured.len(),
                error
            );
            self.status = GenerationStatus::Failed;
            self.error = Some(error);
        }
    }

    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            debug!("Generation cancelled");
            self.status = GenerationStatus::Cancelled;
        }
    }

    pub fn rendering(&self) -> Rendering<'_> {
        match (self.status, &self.error) {
            (GenerationStatus::Failed, Some(error)) => Rendering::Failed {
                sections: self.sections(),
                error,
            },
            (GenerationStatus::Complete, _) if self.structured.is_empty() => {
                Rendering::Markdown(&self.raw)
            }
            _ if self.structured.is_empty() => Rendering::Pending,
            _ => Rendering::Sections(self.sections()),
        }
    }

    /// Take the terminal error of a failed request
    pub fn into_error(self) -> Option<MasteryError> {
        self.error
    }

    /// Finished lesson record; errors for failed or cancelled requests
    pub fn into_content(self, topic_id: &str, level: Level) -> Result<Content> {
        match self.status {
            GenerationStatus::Complete => Ok(Content {
                id: uuid::Uuid::new_v4().to_string(),
                topic_id: topic_id.to_string(),
                level,
                content: self.raw,
                structured: (!self.structured.is_empty()).then_some(self.structured),
                generated_at: Utc::now(),
            }),
            GenerationStatus::Failed => Err(self
                .error
                .unwrap_or_else(|| MasteryError::Feature("Failed to generate content".into()))),
            other => Err(MasteryError::Feature(format!(
                "Content generation did not finish ({:?})",
                other
            ))),
        }
    }
}

/// Consume `stream` into `state`, reporting each change to `on_update`.
///
/// Cancellation is checked before every token; once observed, the stream is
/// dropped and `on_update` is not called again.
pub async fn drive<F>(
    state: &mut ContentState,
    mut stream: TextStream,
    cancel: &CancellationToken,
    mut on_update: F,
) -> GenerationStatus
where
    F: FnMut(ContentUpdate<'_>),
{
    state.begin();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                state.cancel();
                return state.status();
            }
            next = stream.next() => next,
        };

        match next {
            Some(Ok(token)) => {
                let first_index = state.structured.len();
                for (offset, section) in state.push_token(&token).iter().enumerate() {
                    on_update(ContentUpdate::SectionAdded {
                        index: first_index + offset,
                        section,
                    });
                }
            }
            Some(Err(error)) => {
                state.fail(error);
                if let Some(error) = state.error() {
                    on_update(ContentUpdate::Failed {
                        error,
                        sections: state.structured.len(),
                    });
                }
                return state.status();
            }
            None => {
                state.complete();
                on_update(ContentUpdate::Completed {
                    sections: state.structured.len(),
                });
                return state.status();
            }
        }
    }
}

/// Lesson generation over a streaming provider
pub struct ContentGenerator {
    provider: SharedProvider,
    learner: LearnerConfig,
}

impl ContentGenerator {
    pub fn new(provider: SharedProvider, learner: LearnerConfig) -> Self {
        Self { provider, learner }
    }

    /// Stream a lesson, reporting sections as soon as each one closes.
    ///
    /// Transport failures end in `GenerationStatus::Failed` rather than
    /// `Err`, so sections already shown stay available to the caller.
    pub async fn stream_lesson<F>(
        &self,
        topic: &Topic,
        level: Level,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> ContentState
    where
        F: FnMut(ContentUpdate<'_>),
    {
        let prompt = PromptTemplates::lesson(topic, level, &self.learner);
        let mut state = ContentState::new();

        info!(
            "Generating {} lesson for {} ({})",
            level,
            topic.id,
            self.provider.name()
        );

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                state.cancel();
                return state;
            }
            opened = self.provider.stream(&prompt) => opened,
        };

        match opened {
            Ok(stream) => {
                drive(&mut state, stream, cancel, on_update).await;
            }
            Err(error) => {
                state.begin();
                state.fail(error);
                if let Some(error) = state.error() {
                    on_update(ContentUpdate::Failed { error, sections: 0 });
                }
            }
        }

        info!(
            "Lesson {} finished: {:?}, {} section(s)",
            topic.id,
            state.status(),
            state.structured().len()
        );
        state
    }

    /// Generate a complete lesson record
    pub async fn generate_lesson(&self, topic: &Topic, level: Level) -> Result<Content> {
        let cancel = CancellationToken::new();
        self.stream_lesson(topic, level, &cancel, |_| {})
            .await
            .into_content(&topic.id, level)
    }
}
