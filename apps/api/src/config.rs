use anyhow::{bail, Context, Result};

use crate::storage::BackendKind;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage_backend: BackendKind,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    /// Bearer token accepted on `/api/v1/admin/*`.
    pub admin_token: String,
    /// Signing secret for the mock checkout's `orderId|paymentId` signatures.
    pub payment_key_secret: String,
    pub payment_simulated_delay_ms: u64,
    pub password_hash_iterations: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend: BackendKind = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL").ok();
        let redis_url = std::env::var("REDIS_URL").ok();
        match storage_backend {
            BackendKind::Postgres if database_url.is_none() => {
                bail!("STORAGE_BACKEND=postgres requires DATABASE_URL")
            }
            BackendKind::Redis if redis_url.is_none() => {
                bail!("STORAGE_BACKEND=redis requires REDIS_URL")
            }
            _ => {}
        }

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_backend,
            database_url,
            redis_url,
            admin_token: require_env("ADMIN_TOKEN")?,
            payment_key_secret: require_env("PAYMENT_KEY_SECRET")?,
            payment_simulated_delay_ms: parse_env("PAYMENT_SIMULATED_DELAY_MS", 2000)
                .context("PAYMENT_SIMULATED_DELAY_MS must be a number of milliseconds")?,
            password_hash_iterations: parse_env("PASSWORD_HASH_ITERATIONS", 100_000)
                .context("PASSWORD_HASH_ITERATIONS must be a positive integer")?,
        })
    }

    /// In-memory configuration with cheap hashing and no simulated latency.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            storage_backend: BackendKind::Memory,
            database_url: None,
            redis_url: None,
            admin_token: "admin-secret".to_string(),
            payment_key_secret: "test-key-secret".to_string(),
            payment_simulated_delay_ms: 0,
            password_hash_iterations: 1_000,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
