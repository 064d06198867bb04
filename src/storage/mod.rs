mod memory;
mod postgres;

pub use self::{memory::MemoryProfileStore, postgres::PostgresProfileStore};

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::{
    config::{AppConfig, StorageBackend},
    models::{DailyLog, LogEntry, UserProfile},
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("stored profile is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage is misconfigured: {0}")]
    Config(String),
}

/// Flat key-value store holding one `UserProfile` document per storage key,
/// and a daily log of dated entries per log key.
pub trait ProfileStore: Send + Sync {
    fn description(&self) -> String;

    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>, StorageError>>;

    /// Inserts or replaces the document stored under `key`.
    fn save<'a>(&'a self, key: &'a str, profile: &'a UserProfile) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Removes the document; returns whether one existed.
    fn clear<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool, StorageError>>;

    /// Every entry logged under `key`; empty when nothing was logged.
    fn load_log<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DailyLog, StorageError>>;

    /// Inserts or replaces the entry for `date`.
    fn save_log_entry<'a>(
        &'a self,
        key: &'a str,
        date: NaiveDate,
        entry: &'a LogEntry,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Removes the entry for `date`; returns whether one existed.
    fn remove_log_entry<'a>(&'a self, key: &'a str, date: NaiveDate) -> BoxFuture<'a, Result<bool, StorageError>>;
}

pub async fn create_store(config: &AppConfig) -> Result<Arc<dyn ProfileStore>, StorageError> {
    let store: Arc<dyn ProfileStore> = match (config.backend, &config.database) {
        (StorageBackend::Memory, _) => Arc::new(MemoryProfileStore::new()),
        (StorageBackend::Postgres, Some(database)) => Arc::new(PostgresProfileStore::connect(database).await?),
        (StorageBackend::Postgres, None) => {
            return Err(StorageError::Config("postgres backend without database settings".to_string()));
        }
    };
    tracing::info!("profile store: {}", store.description());
    Ok(store)
}
