use std::{env, str::FromStr};

use anyhow::{bail, Context, Result};

use crate::engine::{ValidationPolicy, DEFAULT_MONTHS_TO_PREDICT};

pub const DEFAULT_STORAGE_KEY: &str = "joycycles.profile.v1";
pub const DEFAULT_LOG_KEY: &str = "joycycles.log.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" => Ok(StorageBackend::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Engine-facing settings shared by every route.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub storage_key: String,
    pub log_key: String,
    pub policy: ValidationPolicy,
    pub months_to_predict: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_key: DEFAULT_LOG_KEY.to_string(),
            policy: ValidationPolicy::standard(),
            months_to_predict: DEFAULT_MONTHS_TO_PREDICT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3050)?;
        let backend = lookup("STORAGE_BACKEND")
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Memory);

        let database = match backend {
            StorageBackend::Memory => None,
            StorageBackend::Postgres => Some(DatabaseConfig {
                url: lookup("DATABASE_URL").context("DATABASE_URL is required for the postgres backend")?,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            }),
        };

        let policy = match lookup("VALIDATION_POLICY") {
            Some(name) => ValidationPolicy::by_name(&name)?,
            None => ValidationPolicy::standard(),
        };
        let engine = EngineSettings {
            storage_key: lookup("STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            log_key: lookup("LOG_STORAGE_KEY").unwrap_or_else(|| DEFAULT_LOG_KEY.to_string()),
            policy,
            months_to_predict: parse_or(&lookup, "MONTHS_TO_PREDICT", DEFAULT_MONTHS_TO_PREDICT)?,
        };

        Ok(AppConfig {
            host,
            port,
            backend,
            database,
            engine,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.parse().with_context(|| format!("invalid {key}: {raw}")),
        None => Ok(default),
    }
}
