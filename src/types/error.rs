//! Unified Error Type System
//!
//! Centralized error types for the whole application.
//!
//! ## Error Categories
//!
//! - **Transport**: HTTP/network failures from any LLM or data store call.
//!   Surfaced once, never retried automatically.
//! - **Malformed output**: a feature expected a JSON object and found none.
//!   Individual malformed lesson sections never reach this type; they are
//!   dropped by the extractor.
//! - **Fallback**: missing data store tables are not errors at all; callers
//!   receive [`crate::storage::Sourced::Fallback`] instead.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used to describe transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Authentication failed (bad or missing API key)
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable or endpoint missing
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response body could not be decoded
    ParseError,
    /// Temporary server issues (5xx)
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Transport-level LLM error with category and context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            status: None,
        }
    }

    /// Attach the HTTP status that caused this error
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500..=599 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider).status(status)
    }

    /// Classify a reqwest failure (connect, timeout, body read)
    pub fn classify_reqwest(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else if err.is_request() || err.is_body() {
            ErrorCategory::Network
        } else {
            ErrorCategory::Unknown
        };

        let mut llm_err = LlmError::with_provider(category, err.to_string(), provider);
        if let Some(status) = err.status() {
            llm_err = llm_err.status(status.as_u16());
        }
        llm_err
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum MasteryError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Structured LLM transport error
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Hosted data store request failed
    #[error("Data store error: {0}")]
    DataStore(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// An LLM reply did not contain the JSON object a feature needs
    #[error("Failed to parse {what} response: {reason}")]
    MalformedResponse { what: String, reason: String },

    /// User-visible feature failure (e.g. empty transcript)
    #[error("{0}")]
    Feature(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<LlmError> for MasteryError {
    fn from(err: LlmError) -> Self {
        MasteryError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, MasteryError>;

impl MasteryError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn malformed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// True for failures of the network layer (LLM or data store)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Llm(_) | Self::DataStore(_) | Self::Http(_) | Self::Timeout { .. }
        )
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| MasteryError::Storage(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| MasteryError::Storage(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Transient.to_string(), "TRANSIENT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited", "xai");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);
        assert_eq!(rate_limit.status, Some(429));

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "xai");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = ErrorClassifier::classify_http_status(500, "Server error", "xai");
        assert_eq!(server_error.category, ErrorCategory::Transient);

        let missing = ErrorClassifier::classify_http_status(404, "Not found", "xai");
        assert_eq!(missing.category, ErrorCategory::Unavailable);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "xai");
        assert_eq!(err.to_string(), "[xai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_is_transport() {
        let llm: MasteryError = LlmError::new(ErrorCategory::Transient, "boom").into();
        assert!(llm.is_transport());
        assert!(MasteryError::DataStore("down".into()).is_transport());
        assert!(!MasteryError::malformed("quiz", "no JSON").is_transport());
        assert!(!MasteryError::Feature("No speech detected".into()).is_transport());
    }

    #[test]
    fn test_malformed_display() {
        let err = MasteryError::malformed("keywords", "no JSON object found");
        assert_eq!(
            err.to_string(),
            "Failed to parse keywords response: no JSON object found"
        );
    }
}
