use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub nats_url: String,
    pub directory_url: String,
    pub directory_token: Option<String>,
    /// Bound on a single directory request.
    pub directory_timeout: Duration,
    /// TTL of the in-process profile cache.
    pub directory_cache_ttl: Duration,
    pub port: u16,
    /// Deliveries after which a retryable event is dead-lettered.
    pub max_deliveries: i64,
    /// Upper bound on concurrent per-company match emissions.
    pub emission_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            nats_url: env::var("NATS_URL")
                .unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            directory_url: env::var("DIRECTORY_URL").context("DIRECTORY_URL must be set")?,
            directory_token: env::var("DIRECTORY_TOKEN").ok(),
            directory_timeout: Duration::from_millis(
                env::var("DIRECTORY_TIMEOUT_MS")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .context("DIRECTORY_TIMEOUT_MS must be a valid number")?,
            ),
            directory_cache_ttl: Duration::from_millis(
                env::var("DIRECTORY_CACHE_TTL_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .context("DIRECTORY_CACHE_TTL_MS must be a valid number")?,
            ),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            max_deliveries: env::var("MAX_DELIVERIES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("MAX_DELIVERIES must be a valid number")?,
            emission_concurrency: env::var("EMISSION_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("EMISSION_CONCURRENCY must be a valid number")?,
        })
    }
}
