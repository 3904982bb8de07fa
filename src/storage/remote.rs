//! Hosted data store client (PostgREST-style REST API)
//!
//! Tables: `modules`, `topics`, `user_progress`. Every failure, including
//! a table that does not exist yet, surfaces as [`MasteryError::DataStore`];
//! callers decide whether that means falling back to local data.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::DataStoreConfig;
use crate::constants::network;
use crate::types::{Level, MasteryError, Module, Result, Topic, UserProgress};

pub struct RemoteStore {
    client: Client,
    /// `{project}/rest/v1/`
    rest_base: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("rest_base", &self.rest_base.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// Body for a new progress row; the store assigns the id
#[derive(Serialize)]
struct ProgressInsert<'a> {
    user_id: &'a str,
    topic_id: &'a str,
    basic_completed: bool,
    basic_completed_at: Option<DateTime<Utc>>,
    advanced_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_completed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct LevelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    basic_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    basic_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_completed_at: Option<DateTime<Utc>>,
}

impl LevelUpdate {
    fn completed(level: Level, at: DateTime<Utc>) -> Self {
        match level {
            Level::Basic => Self {
                basic_completed: Some(true),
                basic_completed_at: Some(at),
                advanced_completed: None,
                advanced_completed_at: None,
            },
            Level::Advanced => Self {
                basic_completed: None,
                basic_completed_at: None,
                advanced_completed: Some(true),
                advanced_completed_at: Some(at),
            },
        }
    }
}

impl RemoteStore {
    pub fn new(url: &str, anon_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| MasteryError::Config(format!("Invalid data store URL {}: {}", url, e)))?;
        let rest_base = base
            .join("rest/v1/")
            .map_err(|e| MasteryError::Config(format!("Invalid data store URL {}: {}", url, e)))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rest_base,
            anon_key: SecretString::from(anon_key.into()),
        })
    }

    /// `None` when the store is disabled or credentials are missing
    pub fn from_config(config: &DataStoreConfig) -> Result<Option<Self>> {
        match config.credentials() {
            Some((url, key)) => Self::new(&url, key, config.timeout_secs).map(Some),
            None => Ok(None),
        }
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.rest_base
            .join(table)
            .map_err(|e| MasteryError::DataStore(format!("Invalid table {}: {}", table, e)))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.anon_key.expose_secret();
        request.header("apikey", key).bearer_auth(key)
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| MasteryError::DataStore(format!("{}: {}", table, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MasteryError::DataStore(format!(
                "{} returned {}: {}",
                table, status, body
            )));
        }
        Ok(response)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let url = self.table_url(table)?;
        debug!("GET {} {:?}", url, query);

        let request = self.client.get(url).query(&[("select", "*")]).query(query);
        self.send(table, request)
            .await?
            .json()
            .await
            .map_err(|e| MasteryError::DataStore(format!("{}: undecodable rows: {}", table, e)))
    }

    /// Modules with their topics, ordered by module number then topic order.
    ///
    /// An empty `modules` table yields an empty list.
    pub async fn fetch_modules(&self) -> Result<Vec<Module>> {
        let modules: Vec<Module> = self
            .select("modules", &[("order", "module_number".to_string())])
            .await?;
        if modules.is_empty() {
            return Ok(modules);
        }

        let topics: Vec<Topic> = self
            .select("topics", &[("order", "order_index".to_string())])
            .await?;
        Ok(assemble_modules(modules, topics))
    }

    pub async fn fetch_progress(&self, user_id: &str) -> Result<Vec<UserProgress>> {
        self.select("user_progress", &[("user_id", format!("eq.{}", user_id))])
            .await
    }

    /// Insert a first-completion record and return the stored row
    pub async fn insert_progress(&self, record: &UserProgress) -> Result<UserProgress> {
        let body = ProgressInsert {
            user_id: &record.user_id,
            topic_id: &record.topic_id,
            basic_completed: record.basic_completed,
            basic_completed_at: record.basic_completed_at,
            advanced_completed: record.advanced_completed,
            advanced_completed_at: record.advanced_completed_at,
        };

        let request = self
            .client
            .post(self.table_url("user_progress")?)
            .header("Prefer", "return=representation")
            .json(&body);

        let mut rows: Vec<UserProgress> = self
            .send("user_progress", request)
            .await?
            .json()
            .await
            .map_err(|e| MasteryError::DataStore(format!("user_progress: undecodable row: {}", e)))?;

        rows.pop()
            .ok_or_else(|| MasteryError::DataStore("user_progress: insert returned no row".into()))
    }

    /// Mark one level complete on an existing row
    pub async fn update_progress(&self, id: &str, level: Level, at: DateTime<Utc>) -> Result<()> {
        let request = self
            .client
            .patch(self.table_url("user_progress")?)
            .query(&[("id", format!("eq.{}", id))])
            .json(&LevelUpdate::completed(level, at));
        self.send("user_progress", request).await?;
        Ok(())
    }
}

/// Attach topics to their modules, each group sorted by `order_index`
pub fn assemble_modules(mut modules: Vec<Module>, topics: Vec<Topic>) -> Vec<Module> {
    modules.sort_by_key(|m| m.module_number);
    for module in &mut modules {
        module.topics = topics
            .iter()
            .filter(|t| t.module_id == module.id)
            .cloned()
            .collect();
        module.topics.sort_by_key(|t| t.order_index);
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, module_id: &str, order_index: u32) -> Topic {
        Topic {
            id: id.to_string(),
            module_id: module_id.to_string(),
            title: id.to_uppercase(),
            subtitle: String::new(),
            order_index,
            challenge: None,
        }
    }

    fn module(id: &str, number: u32) -> Module {
        Module {
            id: id.to_string(),
            module_number: number,
            title: id.to_string(),
            description: String::new(),
            topics: vec![],
        }
    }

    #[test]
    fn test_table_urls() {
        let store = RemoteStore::new("https://abc.supabase.co/", "anon", 5).unwrap();
        assert_eq!(
            store.table_url("topics").unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/topics"
        );
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        assert!(matches!(
            RemoteStore::new("not a url", "anon", 5),
            Err(MasteryError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let store = RemoteStore::new("https://abc.supabase.co", "anon-secret", 5).unwrap();
        assert!(!format!("{:?}", store).contains("anon-secret"));
    }

    #[test]
    fn test_from_config_without_credentials() {
        let config = DataStoreConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(RemoteStore::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_assemble_modules_groups_and_orders() {
        let modules = vec![module("b", 1), module("a", 0)];
        let topics = vec![
            topic("a2", "a", 2),
            topic("b1", "b", 1),
            topic("a1", "a", 1),
            topic("orphan", "z", 1),
        ];

        let assembled = assemble_modules(modules, topics);
        assert_eq!(assembled[0].id, "a");
        let ids: Vec<_> = assembled[0].topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
        assert_eq!(assembled[1].topics.len(), 1);
    }

    #[test]
    fn test_level_update_body() {
        let at = Utc::now();
        let body = serde_json::to_value(LevelUpdate::completed(Level::Advanced, at)).unwrap();
        assert_eq!(body["advanced_completed"], true);
        assert!(body.get("basic_completed").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_datastore_error() {
        let store = RemoteStore::new("http://127.0.0.1:9", "anon", 2).unwrap();
        let err = store.fetch_modules().await.unwrap_err();
        assert!(matches!(err, MasteryError::DataStore(_)));
        assert!(err.is_transport());
    }
}
