//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Primary content model (lessons, quizzes, deep dives)
pub mod content_llm {
    pub const API_BASE: &str = "https://api.x.ai/v1";
    pub const MODEL: &str = "grok-3";
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOKENS: usize = 4000;
    pub const API_KEY_ENV: &str = "XAI_API_KEY";
}

/// Alternate model used by the memorize feature
pub mod analysis_llm {
    pub const API_BASE: &str = "https://openrouter.ai/api/v1";
    pub const MODEL: &str = "google/gemini-2.0-flash-lite-001";
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOKENS: usize = 1000;
    pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
    /// Sent as `X-Title` so the provider can attribute traffic
    pub const APP_TITLE: &str = "Marketing Mastery";
    pub const REFERER: &str = "https://github.com/marketing-mastery";
}

/// Hosted data store
pub mod datastore {
    pub const URL_ENV: &str = "SUPABASE_URL";
    pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
    pub const TIMEOUT_SECS: u64 = 15;
}

/// Memorize feature limits
pub mod memorize {
    /// Keyword lists longer than this are truncated
    pub const MAX_KEYWORDS: usize = 5;
    /// Stars available per keyword
    pub const STARS_PER_KEYWORD: usize = 5;
    pub const NO_SPEECH_MESSAGE: &str = "No speech detected. Please try speaking again.";
}

/// Tier scoring
pub mod tiers {
    /// 9 modules; the last has no mini-challenge
    pub const TOTAL_TOPICS: usize = 71;
    /// Basic + advanced per topic, counted against 72 slots
    pub const MAX_SCORE: u32 = 144;
}

/// Local storage keys (values are JSON blobs)
pub mod storage_keys {
    pub const AUTH: &str = "marketing_learning_auth";
    pub const NOTES: &str = "marketing_mastery_notes";
    pub const ONBOARDING: &str = "marketing_mastery_memorize_onboarding";
    pub const ONBOARDING_DONE: &str = "completed";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
