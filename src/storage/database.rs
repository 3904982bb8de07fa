//! Database Layer with Connection Pooling and Safe Transactions
//!
//! Local SQLite store for everything the learner keeps on this machine:
//! - JSON blobs in a key-value table (session, notes, onboarding flag)
//! - Progress rows, mirrored from the hosted store when it is reachable
//!
//! Connections come from an r2d2 pool; transactions roll back on error
//! and on panic.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::types::{MasteryError, Result, ResultExt, UserProgress};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Current schema version
const SCHEMA_VERSION: u32 = 1;

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Minimum idle connections to keep ready
    pub min_idle: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl PoolConfig {
    const MIN_POOL_SIZE: u32 = 2;
    const MAX_POOL_SIZE: u32 = 8;

    /// One connection per core, clamped to a small range.
    ///
    /// A single learner rarely has more than a lesson stream and a note
    /// write in flight.
    pub fn optimal_pool_size() -> u32 {
        let cores = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(2);
        cores.clamp(Self::MIN_POOL_SIZE, Self::MAX_POOL_SIZE)
    }

    pub fn auto() -> Self {
        Self {
            max_size: Self::optimal_pool_size(),
            min_idle: 1,
            connection_timeout_secs: 10,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::auto()
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database file and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| {
                MasteryError::Storage(format!("Failed to create connection pool: {}", e))
            })?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    /// In-memory database for tests; a single connection so every caller
    /// sees the same data.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| {
                MasteryError::Storage(format!("Failed to create in-memory pool: {}", e))
            })?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            MasteryError::Storage(format!("Failed to acquire database connection: {}", e))
        })
    }

    /// Create tables if missing and stamp the schema version.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .with_context("Failed to set schema version")?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.conn()?;
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .with_context("Failed to read schema version")
    }

    /// Run `f` inside a transaction; commits on `Ok`, rolls back otherwise.
    ///
    /// A panic inside `f` is caught and reported as a storage error so the
    /// pooled connection stays usable.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + std::panic::UnwindSafe,
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .with_context("Failed to start transaction")?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&tx)));

        match result {
            Ok(Ok(value)) => {
                tx.commit().with_context("Failed to commit transaction")?;
                Ok(value)
            }
            // Dropping `tx` rolls back
            Ok(Err(e)) => Err(e),
            Err(panic_payload) => {
                let panic_msg = panic_payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic_payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "Unknown panic".to_string());

                tracing::error!("Transaction panicked: {}", panic_msg);
                Err(MasteryError::Storage(format!(
                    "Transaction panicked: {}",
                    panic_msg
                )))
            }
        }
    }

    // =========================================================================
    // Key-Value Blobs
    // =========================================================================

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context_fn(|| format!("Failed to read key {}", key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .with_context_fn(|| format!("Failed to write key {}", key))?;
        Ok(())
    }

    /// Returns true when a value was removed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .with_context_fn(|| format!("Failed to delete key {}", key))?;
        Ok(removed > 0)
    }

    /// Read a JSON blob.
    ///
    /// A blob that no longer decodes is removed and reported as absent,
    /// so one corrupt write never locks the learner out.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding unreadable value for {}: {}", key, e);
                self.delete(key)?;
                Ok(None)
            }
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    // =========================================================================
    // Progress
    // =========================================================================

    pub fn load_progress(&self, user_id: &str) -> Result<Vec<UserProgress>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, topic_id, basic_completed, basic_completed_at,
                    advanced_completed, advanced_completed_at
             FROM user_progress WHERE user_id = ?1 ORDER BY topic_id",
        )?;
        let rows = stmt
            .query_map(params![user_id], progress_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to load progress")?;
        Ok(rows)
    }

    /// Insert or replace the record for `(user_id, topic_id)`.
    pub fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let conn = self.conn()?;
        write_progress(&conn, progress)
    }

    /// Replace all local rows for a user with a fresh remote snapshot.
    pub fn replace_progress(&self, user_id: &str, records: &[UserProgress]) -> Result<()> {
        let user_id = user_id.to_string();
        let records = records.to_vec();
        self.transaction(move |conn| {
            conn.execute(
                "DELETE FROM user_progress WHERE user_id = ?1",
                params![user_id],
            )?;
            for record in &records {
                write_progress(conn, record)?;
            }
            Ok(())
        })
    }
}

fn write_progress(conn: &Connection, progress: &UserProgress) -> Result<()> {
    conn.execute(
        "INSERT INTO user_progress
            (id, user_id, topic_id, basic_completed, basic_completed_at,
             advanced_completed, advanced_completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(user_id, topic_id) DO UPDATE SET
            id = excluded.id,
            basic_completed = excluded.basic_completed,
            basic_completed_at = excluded.basic_completed_at,
            advanced_completed = excluded.advanced_completed,
            advanced_completed_at = excluded.advanced_completed_at",
        params![
            progress.id,
            progress.user_id,
            progress.topic_id,
            progress.basic_completed,
            progress.basic_completed_at.map(|t| t.to_rfc3339()),
            progress.advanced_completed,
            progress.advanced_completed_at.map(|t| t.to_rfc3339()),
        ],
    )
    .with_context_fn(|| format!("Failed to save progress for {}", progress.topic_id))?;
    Ok(())
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<UserProgress> {
    Ok(UserProgress {
        id: row.get(0)?,
        user_id: row.get(1)?,
        topic_id: row.get(2)?,
        basic_completed: row.get(3)?,
        basic_completed_at: parse_timestamp(row.get(4)?),
        advanced_completed: row.get(5)?,
        advanced_completed_at: parse_timestamp(row.get(6)?),
    })
}

fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    })
}
