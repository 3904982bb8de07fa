pub mod content;
pub mod curriculum;
pub mod error;
pub mod learning;

pub use content::{Content, ContentSection, Level, SectionType, StructuredContent};
pub use curriculum::{Module, ModuleSummary, Topic, UserProgress};
pub use error::{ErrorCategory, ErrorClassifier, LlmError, MasteryError, Result, ResultExt};
pub use learning::{
    DeepDiveMode, DeepDiveResponse, KeywordAnalysis, Note, Quiz, QuizQuestion, TranscriptAnalysis,
};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// Type-safe wrapper for learner ids
///
/// Prevents accidental mixing of user ids with topic ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
