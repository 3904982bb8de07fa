//! Curriculum and progress records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Level;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub subtitle: String,
    pub order_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub module_number: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Completion record for one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub id: String,
    pub user_id: String,
    pub topic_id: String,
    pub basic_completed: bool,
    pub basic_completed_at: Option<DateTime<Utc>>,
    pub advanced_completed: bool,
    pub advanced_completed_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// Fresh record for a first completion.
    ///
    /// Completing advanced without a prior record also marks basic.
    pub fn first_completion(user_id: &str, topic_id: &str, level: Level, now: DateTime<Utc>) -> Self {
        let advanced = level == Level::Advanced;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic_id: topic_id.to_string(),
            basic_completed: true,
            basic_completed_at: Some(now),
            advanced_completed: advanced,
            advanced_completed_at: advanced.then_some(now),
        }
    }

    /// Mark a level complete on an existing record
    pub fn mark(&mut self, level: Level, now: DateTime<Utc>) {
        match level {
            Level::Basic => {
                self.basic_completed = true;
                self.basic_completed_at = Some(now);
            }
            Level::Advanced => {
                self.advanced_completed = true;
                self.advanced_completed_at = Some(now);
            }
        }
    }

    pub fn is_complete(&self, level: Level) -> bool {
        match level {
            Level::Basic => self.basic_completed,
            Level::Advanced => self.advanced_completed,
        }
    }

    /// Points contributed to the tier score (0-2)
    pub fn points(&self) -> u32 {
        u32::from(self.basic_completed) + u32::from(self.advanced_completed)
    }
}

/// Per-module completion counts
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub module_number: u32,
    pub title: String,
    pub completed_basic: usize,
    pub completed_advanced: usize,
    pub total_topics: usize,
}
