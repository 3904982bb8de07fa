//! Learning features built on single-shot completions
//!
//! Each feature catches malformed replies at its own boundary: quiz and
//! memorize report an error, deep dive falls back to the raw reply.

pub mod deep_dive;
pub mod memorize;
pub mod quiz;

pub use deep_dive::{DeepDiveGenerator, DeepDiveRequest};
pub use memorize::{MemorizeCoach, analysis_provider_config};
pub use quiz::{AnswerOutcome, QuizGenerator, QuizResult, grade};
