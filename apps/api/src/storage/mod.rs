//! Key/value persistence for every Kalakriti record.
//!
//! All state is stored as JSON blobs under a fixed set of keys (`StorageKey`).
//! `KeyValueStore` is the pluggable backend seam (memory, PostgreSQL, Redis);
//! `Repository` is the typed layer every service goes through.
//!
//! Read-modify-write cycles go through `Repository::update`, which holds a
//! single write lock for the whole cycle so two requests never interleave
//! their writes to the same blob.

pub mod memory;
pub mod postgres;
pub mod redis_store;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::Config;

// ────────────────────────────────────────────────────────────────────────────
// Keys
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of persisted blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Users,
    Sessions,
    Participants,
    Submissions,
    EventResults,
    Queries,
    PaymentIntent,
    RegistrationDrafts,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Users => "kalakriti-users",
            StorageKey::Sessions => "kalakriti-token",
            StorageKey::Participants => "kalakriti-participants",
            StorageKey::Submissions => "kalakriti-submissions",
            StorageKey::EventResults => "kalakriti-event-results",
            StorageKey::Queries => "kalakriti-queries",
            StorageKey::PaymentIntent => "kalakriti-payment-intent",
            StorageKey::RegistrationDrafts => "kalakriti-registration-drafts",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("stored value under '{key}' is not valid JSON for its record type: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("unknown storage backend '{0}' (expected memory, postgres or redis)")]
    UnknownBackend(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait
// ────────────────────────────────────────────────────────────────────────────

/// Raw string blob store. Implement this to add a backend without touching
/// any service code.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Postgres,
    Redis,
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            "redis" => Ok(BackendKind::Redis),
            other => Err(StorageError::UnknownBackend(other.to_string())),
        }
    }
}

/// Builds the backend selected by `STORAGE_BACKEND`.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let backend: Arc<dyn KeyValueStore> = match config.storage_backend {
        BackendKind::Memory => Arc::new(memory::MemoryStore::default()),
        BackendKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
            Arc::new(postgres::PgStore::connect(url).await?)
        }
        BackendKind::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL is not set"))?;
            Arc::new(redis_store::RedisStore::open(url)?)
        }
    };
    info!("Storage backend: {}", backend.backend_tag());
    Ok(backend)
}

// ────────────────────────────────────────────────────────────────────────────
// Typed repository
// ────────────────────────────────────────────────────────────────────────────

/// Typed access to the fixed storage keys.
pub struct Repository {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl Repository {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.backend.backend_tag()
    }

    /// Loads and decodes the value under `key`. An absent key yields `T::default()`.
    pub async fn load<T>(&self, key: StorageKey) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default,
    {
        let raw = self.backend.get(key.as_str()).await?;
        decode(key, raw)
    }

    /// Encodes and stores `value` under `key`, replacing what was there.
    pub async fn save<T>(&self, key: StorageKey, value: &T) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let _guard = self.write_lock.lock().await;
        self.write(key, value).await
    }

    /// Serialized read-modify-write. The value is only written back when `f`
    /// returns `Ok`.
    pub async fn update<T, R, E, F>(&self, key: StorageKey, f: F) -> Result<R, E>
    where
        T: DeserializeOwned + Serialize + Default,
        E: From<StorageError>,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _guard = self.write_lock.lock().await;
        let raw = self.backend.get(key.as_str()).await?;
        let mut value: T = decode(key, raw)?;
        let out = f(&mut value)?;
        self.write(key, &value).await?;
        Ok(out)
    }

    async fn write<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.as_str(),
            source,
        })?;
        // A cleared optional value drops the key entirely.
        if encoded == "null" {
            debug!("Removing '{}'", key);
            return self.backend.remove(key.as_str()).await;
        }
        debug!("Writing {} bytes to '{}'", encoded.len(), key);
        self.backend.set(key.as_str(), encoded).await
    }
}

fn decode<T>(key: StorageKey, raw: Option<String>) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(raw) if raw.trim().is_empty() => Ok(T::default()),
        Some(raw) => serde_json::from_str(&raw).map_err(|source| {
            error!("Corrupt JSON under '{key}': {source}");
            StorageError::Corrupt {
                key: key.as_str(),
                source,
            }
        }),
    }
}
