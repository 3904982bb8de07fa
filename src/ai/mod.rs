//! AI Integration Layer
//!
//! Prompt construction, chat completion transport (single-shot and SSE
//! streamed) and JSON extraction from model replies.

pub mod json;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use json::{extract_json_object, parse_json_object};
pub use prompt::{PromptBuilder, PromptSection, PromptTemplates, SectionPlan};
pub use provider::{
    ChatCompletionsProvider, LlmProvider, LlmResponse, ProviderConfig, SharedProvider, TextStream,
    create_provider,
};
pub use timeout::with_timeout;
