//! Learner session
//!
//! One configured learner. Logging in checks the configured credentials
//! and persists a small session blob; every learner-facing command asks
//! the [`SessionManager`] for the current session first.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LearnerConfig;
use crate::constants::storage_keys;
use crate::storage::SharedDatabase;
use crate::types::{MasteryError, Result, UserId};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Configured display name, whatever casing was typed at login
    pub username: String,
    #[serde(default)]
    pub user_id: String,
    pub is_authenticated: bool,
}

impl Session {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user_id.clone())
    }
}

pub struct SessionManager {
    db: SharedDatabase,
    learner: LearnerConfig,
}

impl SessionManager {
    pub fn new(db: SharedDatabase, learner: LearnerConfig) -> Self {
        Self { db, learner }
    }

    /// Username compares case-insensitively, password exactly.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let username_ok = username.trim().to_lowercase() == self.learner.username.to_lowercase();
        if !username_ok || password != self.learner.password {
            return Err(MasteryError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let session = Session {
            username: self.learner.username.clone(),
            user_id: self.learner.user_id.clone(),
            is_authenticated: true,
        };
        self.db.set_json(storage_keys::AUTH, &session)?;
        info!("Logged in as {}", session.username);
        Ok(session)
    }

    /// Stored session, if one is present and authenticated
    pub fn current(&self) -> Result<Option<Session>> {
        let session = self.db.get_json::<Session>(storage_keys::AUTH)?;
        Ok(session.filter(|s| s.is_authenticated).map(|mut s| {
            // Blobs written before user ids were stored
            if s.user_id.is_empty() {
                s.user_id = self.learner.user_id.clone();
            }
            s
        }))
    }

    pub fn require(&self) -> Result<Session> {
        self.current()?.ok_or_else(|| {
            MasteryError::Auth("Not logged in. Run `mastery login <username>` first".to_string())
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.db.delete(storage_keys::AUTH)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use std::sync::Arc;

    fn manager() -> SessionManager {
        SessionManager::new(
            Arc::new(Database::open_in_memory().unwrap()),
            LearnerConfig::default(),
        )
    }

    #[test]
    fn test_login_case_insensitive_username() {
        let sessions = manager();
        let session = sessions.login("ISHA", "isha@123").unwrap();
        assert_eq!(session.username, "Isha");
        assert_eq!(session.user_id().as_str(), "isha");
        assert_eq!(sessions.current().unwrap(), Some(session));
    }

    #[test]
    fn test_password_is_exact() {
        let sessions = manager();
        let err = sessions.login("Isha", "ISHA@123").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Invalid username or password"
        );
        assert!(sessions.current().unwrap().is_none());
        assert!(sessions.require().is_err());
    }

    #[test]
    fn test_logout() {
        let sessions = manager();
        sessions.login("isha", "isha@123").unwrap();
        sessions.logout().unwrap();
        assert!(sessions.current().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_or_unauthenticated_blob() {
        let sessions = manager();
        sessions.db.set(storage_keys::AUTH, "not json").unwrap();
        assert!(sessions.current().unwrap().is_none());

        sessions
            .db
            .set(storage_keys::AUTH, r#"{"username":"Isha","isAuthenticated":false}"#)
            .unwrap();
        assert!(sessions.current().unwrap().is_none());
    }

    #[test]
    fn test_legacy_blob_without_user_id() {
        let sessions = manager();
        sessions
            .db
            .set(storage_keys::AUTH, r#"{"username":"Isha","isAuthenticated":true}"#)
            .unwrap();
        assert_eq!(sessions.require().unwrap().user_id, "isha");
    }
}
