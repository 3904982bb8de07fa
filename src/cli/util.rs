//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::sync::Arc;
use std::time::Duration;

use crate::ai::{SharedProvider, create_provider};
use crate::config::{Config, ConfigLoader, LlmConfig};
use crate::constants::content_llm;
use crate::curriculum::{find_topic, load_modules};
use crate::learning::analysis_provider_config;
use crate::session::{Session, SessionManager};
use crate::storage::{Database, ProgressTracker, RemoteStore, SharedDatabase, Sourced};
use crate::types::{MasteryError, Module, Result, Topic};

/// Command execution context
///
/// Loaded once per invocation: configuration, the local database and the
/// optional hosted store.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub db: SharedDatabase,
    pub remote: Option<Arc<RemoteStore>>,
}

impl CommandContext {
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let db = Database::open(ConfigLoader::database_path(&config))?;
        let remote = RemoteStore::from_config(&config.datastore)?.map(Arc::new);

        Ok(Self {
            config,
            db: Arc::new(db),
            remote,
        })
    }

    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.db.clone(), self.config.learner.clone())
    }

    /// Current session, or an error telling the learner to log in
    pub fn require_session(&self) -> Result<Session> {
        self.sessions().require()
    }

    pub fn content_provider(&self) -> Result<SharedProvider> {
        create_provider(
            self.config
                .content_llm
                .to_provider_config(content_llm::API_KEY_ENV),
        )
    }

    pub fn analysis_provider(&self) -> Result<SharedProvider> {
        create_provider(analysis_provider_config(&self.config.analysis_llm))
    }

    pub async fn modules(&self) -> Sourced<Vec<Module>> {
        load_modules(self.remote.as_deref()).await
    }

    /// Resolve a topic id against the current curriculum
    pub async fn topic(&self, topic_id: &str) -> Result<Topic> {
        let modules = self.modules().await.into_inner();
        find_topic(&modules, topic_id)
            .map(|(_, topic)| topic.clone())
            .ok_or_else(|| MasteryError::NotFound(format!("topic {}", topic_id)))
    }

    pub async fn progress(&self, session: &Session) -> Result<ProgressTracker> {
        ProgressTracker::load(self.db.clone(), self.remote.clone(), &session.user_id).await
    }
}

pub fn llm_timeout(config: &LlmConfig) -> Duration {
    Duration::from_secs(config.timeout_secs)
}

/// Read all of stdin, for piped transcripts
pub fn read_stdin() -> Result<String> {
    use std::io::Read;
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

// Context loading touches the working directory's `.mastery/`; covered by
// the storage and config tests instead of here.
