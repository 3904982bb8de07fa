//! Progressive lesson content
//!
//! - `extractor`: finds complete sections in a partial streamed reply
//! - `stream`: per-request state machine and the lesson generator

pub mod extractor;
pub mod stream;

pub use extractor::extract_sections;
pub use stream::{
    ContentGenerator, ContentState, ContentUpdate, GenerationStatus, Rendering, drive,
};
