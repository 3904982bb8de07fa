//! Marketing Mastery - curriculum tutor with streamed LLM lessons
//!
//! A single learner works through a fixed marketing curriculum. Lessons are
//! streamed from a chat completions endpoint and shown section by section
//! as soon as each JSON object in the reply closes; quizzes, deep dives and
//! recall practice use single-shot completions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mastery::ai::{create_provider, ProviderConfig};
//! use mastery::content::ContentGenerator;
//! use tokio_util::sync::CancellationToken;
//!
//! let provider = create_provider(config.content_llm.to_provider_config("XAI_API_KEY"))?;
//! let generator = ContentGenerator::new(provider, config.learner.clone());
//! let cancel = CancellationToken::new();
//! let state = generator
//!     .stream_lesson(&topic, Level::Basic, &cancel, |update| println!("{:?}", update))
//!     .await;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompts, chat completions transport (SSE streaming), JSON extraction
//! - [`content`]: section extractor and streaming content state machine
//! - [`curriculum`]: bundled curriculum, remote loading, tiers
//! - [`learning`]: quizzes, deep dives, memorize
//! - [`storage`]: SQLite persistence and the hosted data store client
//! - [`session`]: learner login
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod curriculum;
pub mod learning;
pub mod session;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{ErrorCategory, LlmError, MasteryError, Result, ResultExt};

pub use storage::{Database, PoolConfig, SharedDatabase, Sourced};

// =============================================================================
// Content Re-exports
// =============================================================================

pub use content::{
    ContentGenerator, ContentState, ContentUpdate, GenerationStatus, Rendering, extract_sections,
};

pub use ai::{LlmProvider, LlmResponse, SharedProvider, TextStream, with_timeout};
