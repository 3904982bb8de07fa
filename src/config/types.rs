//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/mastery/) and project (.mastery/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::provider::ProviderConfig;
use crate::constants::{analysis_llm, content_llm, datastore, network};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Model used for lessons, quizzes and deep dives
    pub content_llm: LlmConfig,

    /// Model used for memorize keyword extraction and transcript scoring
    pub analysis_llm: LlmConfig,

    /// Optional hosted data store
    pub datastore: DataStoreConfig,

    /// The single learner this install serves
    pub learner: LearnerConfig,

    /// Local persistence
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            content_llm: LlmConfig::content_default(),
            analysis_llm: LlmConfig::analysis_default(),
            datastore: DataStoreConfig::default(),
            learner: LearnerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> crate::types::Result<()> {
        for (name, llm) in [
            ("content_llm", &self.content_llm),
            ("analysis_llm", &self.analysis_llm),
        ] {
            if !(0.0..=2.0).contains(&llm.temperature) {
                return Err(crate::types::MasteryError::Config(format!(
                    "{}.temperature must be between 0.0 and 2.0, got {}",
                    name, llm.temperature
                )));
            }
            if llm.timeout_secs == 0 {
                return Err(crate::types::MasteryError::Config(format!(
                    "{}.timeout_secs must be greater than 0",
                    name
                )));
            }
            if llm.max_tokens == 0 {
                return Err(crate::types::MasteryError::Config(format!(
                    "{}.max_tokens must be greater than 0",
                    name
                )));
            }
        }

        if self.learner.username.trim().is_empty() {
            return Err(crate::types::MasteryError::Config(
                "learner.username must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// One OpenAI-compatible chat completions endpoint
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider label used in logs and errors
    pub provider: String,

    /// Endpoint base, `/chat/completions` is appended
    pub api_base: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// API key; falls back to the provider's conventional env var
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::content_default()
    }
}

impl LlmConfig {
    pub fn content_default() -> Self {
        Self {
            provider: "xai".to_string(),
            api_base: content_llm::API_BASE.to_string(),
            model: content_llm::MODEL.to_string(),
            temperature: content_llm::TEMPERATURE,
            max_tokens: content_llm::MAX_TOKENS,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }

    pub fn analysis_default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            api_base: analysis_llm::API_BASE.to_string(),
            model: analysis_llm::MODEL.to_string(),
            temperature: analysis_llm::TEMPERATURE,
            max_tokens: analysis_llm::MAX_TOKENS,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }

    /// Build provider settings, resolving the key from `key_env` when unset
    pub fn to_provider_config(&self, key_env: &str) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var(key_env).ok()),
            extra_headers: Vec::new(),
        }
    }
}

// =============================================================================
// Data Store Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataStoreConfig {
    /// Disable to always use the bundled curriculum and local progress
    pub enabled: bool,

    /// Project URL, e.g. https://xyz.supabase.co
    pub url: Option<String>,

    /// Anonymous API key
    #[serde(skip_serializing)]
    pub anon_key: Option<String>,

    pub timeout_secs: u64,
}

impl std::fmt::Debug for DataStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStoreConfig")
            .field("enabled", &self.enabled)
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            anon_key: None,
            timeout_secs: datastore::TIMEOUT_SECS,
        }
    }
}

impl DataStoreConfig {
    /// Resolved (url, key) pair, or `None` when the store is not usable
    pub fn credentials(&self) -> Option<(String, String)> {
        if !self.enabled {
            return None;
        }
        let url = self
            .url
            .clone()
            .or_else(|| std::env::var(datastore::URL_ENV).ok())?;
        let key = self
            .anon_key
            .clone()
            .or_else(|| std::env::var(datastore::ANON_KEY_ENV).ok())?;
        Some((url, key))
    }
}

// =============================================================================
// Learner Configuration
// =============================================================================

/// Credentials and identity for the single learner
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Display name; login compares case-insensitively
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// Key for progress rows
    pub user_id: String,

    /// Company used to ground lesson examples
    pub company: String,

    /// Short persona description embedded in lesson prompts
    pub persona: String,
}

impl std::fmt::Debug for LearnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnerConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("company", &self.company)
            .finish()
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            username: "Isha".to_string(),
            password: "isha@123".to_string(),
            user_id: "isha".to_string(),
            company: "Nivea India".to_string(),
            persona: "a 34-year-old marketing professional working at Nivea India (FMCG/beauty industry) based in Bangalore".to_string(),
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file (relative paths resolve against the project dir)
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("mastery.db"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
