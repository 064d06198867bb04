use chrono::NaiveDate;
use futures::{future::BoxFuture, FutureExt};
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{ProfileStore, StorageError};
use crate::{
    config::DatabaseConfig,
    models::{DailyLog, LogEntry, UserProfile},
};

/// Profiles kept as JSON text in a `user_profiles` table, log entries one row
/// per date in `daily_logs`.
#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<PostgresProfileStore, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        PostgresProfileStore::with_pool(pool).await
    }

    pub async fn with_pool(pool: PgPool) -> Result<PostgresProfileStore, StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_profiles (
                storage_key TEXT PRIMARY KEY,
                profile TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_logs (
                storage_key TEXT NOT NULL,
                logged_at DATE NOT NULL,
                entry TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (storage_key, logged_at)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(PostgresProfileStore { pool })
    }

    async fn fetch(&self, key: &str) -> Result<Option<UserProfile>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT profile FROM user_profiles WHERE storage_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let profile = row.map(|(raw,)| serde_json::from_str(&raw)).transpose()?;
        Ok(profile)
    }

    async fn upsert(&self, key: &str, profile: &UserProfile) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)?;
        sqlx::query(
            r#"
            INSERT INTO user_profiles (storage_key, profile, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (storage_key) DO UPDATE SET profile = EXCLUDED.profile, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE storage_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_log(&self, key: &str) -> Result<DailyLog, StorageError> {
        let rows: Vec<(NaiveDate, String)> =
            sqlx::query_as("SELECT logged_at, entry FROM daily_logs WHERE storage_key = $1 ORDER BY logged_at")
                .bind(key)
                .fetch_all(&self.pool)
                .await?;

        let mut log = DailyLog::new();
        for (logged_at, raw) in rows {
            log.insert(logged_at, serde_json::from_str(&raw)?);
        }
        Ok(log)
    }

    async fn upsert_log_entry(&self, key: &str, date: NaiveDate, entry: &LogEntry) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entry)?;
        sqlx::query(
            r#"
            INSERT INTO daily_logs (storage_key, logged_at, entry, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (storage_key, logged_at) DO UPDATE SET entry = EXCLUDED.entry, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(date)
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_log_entry(&self, key: &str, date: NaiveDate) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM daily_logs WHERE storage_key = $1 AND logged_at = $2")
            .bind(key)
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl ProfileStore for PostgresProfileStore {
    fn description(&self) -> String {
        "PostgreSQL".to_string()
    }

    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>, StorageError>> {
        self.fetch(key).boxed()
    }

    fn save<'a>(&'a self, key: &'a str, profile: &'a UserProfile) -> BoxFuture<'a, Result<(), StorageError>> {
        self.upsert(key, profile).boxed()
    }

    fn clear<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool, StorageError>> {
        self.delete(key).boxed()
    }

    fn load_log<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DailyLog, StorageError>> {
        self.fetch_log(key).boxed()
    }

    fn save_log_entry<'a>(
        &'a self,
        key: &'a str,
        date: NaiveDate,
        entry: &'a LogEntry,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        self.upsert_log_entry(key, date, entry).boxed()
    }

    fn remove_log_entry<'a>(&'a self, key: &'a str, date: NaiveDate) -> BoxFuture<'a, Result<bool, StorageError>> {
        self.delete_log_entry(key, date).boxed()
    }
}
