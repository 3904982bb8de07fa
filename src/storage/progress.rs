//! Topic completion tracking
//!
//! The hosted store is authoritative when it answered the initial load;
//! every successful remote write is mirrored locally. When it did not,
//! progress lives in the local database only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::Sourced;
use super::database::SharedDatabase;
use super::remote::RemoteStore;
use crate::curriculum::tiers::calculate_score;
use crate::types::{Level, Result, UserProgress};

pub struct ProgressTracker {
    db: SharedDatabase,
    /// Present only when the last load reached the hosted store
    remote: Option<Arc<RemoteStore>>,
    user_id: String,
    records: HashMap<String, UserProgress>,
}

impl ProgressTracker {
    /// Load a user's progress, preferring the hosted store.
    pub async fn load(
        db: SharedDatabase,
        remote: Option<Arc<RemoteStore>>,
        user_id: &str,
    ) -> Result<Self> {
        let (records, remote) = match Self::fetch(&db, remote.as_deref(), user_id).await? {
            Sourced::Remote(records) => (records, remote),
            Sourced::Fallback(records) => (records, None),
        };

        Ok(Self {
            db,
            remote,
            user_id: user_id.to_string(),
            records: records
                .into_iter()
                .map(|p| (p.topic_id.clone(), p))
                .collect(),
        })
    }

    async fn fetch(
        db: &SharedDatabase,
        remote: Option<&RemoteStore>,
        user_id: &str,
    ) -> Result<Sourced<Vec<UserProgress>>> {
        if let Some(remote) = remote {
            match remote.fetch_progress(user_id).await {
                Ok(records) => {
                    db.replace_progress(user_id, &records)?;
                    return Ok(Sourced::Remote(records));
                }
                Err(e) => warn!("Progress table unavailable, using local progress: {}", e),
            }
        }
        Ok(Sourced::Fallback(db.load_progress(user_id)?))
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn get(&self, topic_id: &str) -> Option<&UserProgress> {
        self.records.get(topic_id)
    }

    pub fn is_complete(&self, topic_id: &str, level: Level) -> bool {
        self.get(topic_id).is_some_and(|p| p.is_complete(level))
    }

    /// Advanced content opens once basic is done
    pub fn is_advanced_unlocked(&self, topic_id: &str) -> bool {
        self.is_complete(topic_id, Level::Basic)
    }

    pub fn records(&self) -> impl Iterator<Item = &UserProgress> {
        self.records.values()
    }

    pub fn score(&self) -> u32 {
        calculate_score(self.records.values())
    }

    /// Mark `level` complete for a topic.
    ///
    /// Updates the existing record, or creates one; a first record created
    /// at advanced level also marks basic. A failed remote write leaves
    /// local state untouched.
    pub async fn mark_complete(&mut self, topic_id: &str, level: Level) -> Result<UserProgress> {
        let now = Utc::now();

        let record = match self.records.get(topic_id) {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.mark(level, now);
                if let Some(remote) = &self.remote {
                    remote.update_progress(&updated.id, level, now).await?;
                }
                updated
            }
            None => {
                let fresh = UserProgress::first_completion(&self.user_id, topic_id, level, now);
                match &self.remote {
                    Some(remote) => remote.insert_progress(&fresh).await?,
                    None => fresh,
                }
            }
        };

        self.db.save_progress(&record)?;
        info!("Marked {} {} complete", topic_id, level);
        self.records.insert(topic_id.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn local_tracker(db: &SharedDatabase) -> ProgressTracker {
        ProgressTracker::load(db.clone(), None, "isha").await.unwrap()
    }

    #[tokio::test]
    async fn test_basic_then_advanced() {
        let db: SharedDatabase = Arc::new(Database::open_in_memory().unwrap());
        let mut tracker = local_tracker(&db).await;
        assert!(!tracker.is_remote());
        assert!(!tracker.is_advanced_unlocked("m0-t1"));

        let first = tracker.mark_complete("m0-t1", Level::Basic).await.unwrap();
        assert!(tracker.is_advanced_unlocked("m0-t1"));
        assert_eq!(tracker.score(), 1);

        let second = tracker.mark_complete("m0-t1", Level::Advanced).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(tracker.is_complete("m0-t1", Level::Advanced));
        assert_eq!(tracker.score(), 2);
    }

    #[tokio::test]
    async fn test_advanced_first_marks_basic() {
        let db: SharedDatabase = Arc::new(Database::open_in_memory().unwrap());
        let mut tracker = local_tracker(&db).await;

        let record = tracker.mark_complete("m2-t3", Level::Advanced).await.unwrap();
        assert!(record.basic_completed);
        assert!(record.advanced_completed);
        assert_eq!(tracker.score(), 2);
    }

    #[tokio::test]
    async fn test_progress_survives_reload() {
        let db: SharedDatabase = Arc::new(Database::open_in_memory().unwrap());
        {
            let mut tracker = local_tracker(&db).await;
            tracker.mark_complete("m0-t1", Level::Basic).await.unwrap();
            tracker.mark_complete("m0-t2", Level::Basic).await.unwrap();
        }

        let reloaded = local_tracker(&db).await;
        assert_eq!(reloaded.score(), 2);
        assert_eq!(reloaded.records().count(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_local() {
        let db: SharedDatabase = Arc::new(Database::open_in_memory().unwrap());
        db.save_progress(&UserProgress::first_completion(
            "isha",
            "m0-t1",
            Level::Basic,
            Utc::now(),
        ))
        .unwrap();

        let remote = Arc::new(RemoteStore::new("http://127.0.0.1:9", "anon", 2).unwrap());
        let mut tracker = ProgressTracker::load(db, Some(remote), "isha").await.unwrap();

        assert!(!tracker.is_remote());
        assert!(tracker.is_complete("m0-t1", Level::Basic));
        // Writes go local without touching the dead remote
        tracker.mark_complete("m0-t2", Level::Basic).await.unwrap();
        assert_eq!(tracker.score(), 2);
    }
}
