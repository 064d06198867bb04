use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use futures::{future::BoxFuture, FutureExt};
use tokio::sync::Mutex;

use super::{ProfileStore, StorageError};
use crate::models::{DailyLog, LogEntry, UserProfile};

#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<Mutex<HashMap<String, UserProfile>>>,
    logs: Arc<Mutex<HashMap<String, DailyLog>>>,
}

impl MemoryProfileStore {
    pub fn new() -> MemoryProfileStore {
        MemoryProfileStore::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn description(&self) -> String {
        "HashMap Memory".to_string()
    }

    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>, StorageError>> {
        async move {
            let locked = self.profiles.lock().await;
            Ok(locked.get(key).cloned())
        }
        .boxed()
    }

    fn save<'a>(&'a self, key: &'a str, profile: &'a UserProfile) -> BoxFuture<'a, Result<(), StorageError>> {
        async move {
            let mut locked = self.profiles.lock().await;
            locked.insert(key.to_string(), profile.clone());
            Ok(())
        }
        .boxed()
    }

    fn clear<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool, StorageError>> {
        async move {
            let mut locked = self.profiles.lock().await;
            Ok(locked.remove(key).is_some())
        }
        .boxed()
    }

    fn load_log<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DailyLog, StorageError>> {
        async move {
            let locked = self.logs.lock().await;
            Ok(locked.get(key).cloned().unwrap_or_default())
        }
        .boxed()
    }

    fn save_log_entry<'a>(
        &'a self,
        key: &'a str,
        date: NaiveDate,
        entry: &'a LogEntry,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        async move {
            let mut locked = self.logs.lock().await;
            locked.entry(key.to_string()).or_default().insert(date, entry.clone());
            Ok(())
        }
        .boxed()
    }

    fn remove_log_entry<'a>(&'a self, key: &'a str, date: NaiveDate) -> BoxFuture<'a, Result<bool, StorageError>> {
        async move {
            let mut locked = self.logs.lock().await;
            let removed = locked.get_mut(key).and_then(|log| log.remove(&date));
            Ok(removed.is_some())
        }
        .boxed()
    }
}
