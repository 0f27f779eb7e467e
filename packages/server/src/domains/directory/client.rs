//! Profile directory client.
//!
//! Synchronous read-through accessor to the set of company search profiles,
//! owned by the external directory service. The client applies a bounded
//! request timeout and distinguishes "no profiles" (empty list) from
//! "directory unavailable" (typed error) so the consumer can retry instead of
//! treating an outage as zero matches.
//!
//! A short TTL cache absorbs bursts of applicant-created events without
//! hammering the directory service. The cache is cleared on any fetch error -
//! stale profiles are never served as a fallback.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domains::matching::models::CompanySearchProfile;

/// Directory failures the consumer treats as retryable.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("profile directory request timed out")]
    Timeout,

    #[error("profile directory unavailable: {0}")]
    Unavailable(String),

    #[error("profile directory returned a malformed response: {0}")]
    Malformed(String),
}

/// Read access to the current set of company search profiles.
#[async_trait]
pub trait BaseProfileDirectory: Send + Sync {
    /// Fetch every registered search profile. An empty list is a valid
    /// answer; unavailability is always an error, never an empty list.
    async fn get_all_search_profiles(
        &self,
    ) -> Result<Vec<CompanySearchProfile>, DirectoryError>;
}

struct CachedProfiles {
    fetched_at: Instant,
    profiles: Vec<CompanySearchProfile>,
}

/// HTTP client for the directory service with a seconds-scale TTL cache.
pub struct HttpProfileDirectory {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedProfiles>>,
}

impl HttpProfileDirectory {
    pub fn new(
        base_url: String,
        auth_token: Option<String>,
        request_timeout: Duration,
        cache_ttl: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            cache_ttl,
            cache: RwLock::new(None),
        })
    }

    async fn fetch(&self) -> Result<Vec<CompanySearchProfile>, DirectoryError> {
        let mut request = self
            .client
            .get(format!("{}/search-profiles", self.base_url));

        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Timeout
            } else {
                DirectoryError::Unavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<CompanySearchProfile>>()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }
}

impl HttpProfileDirectory {
    async fn fresh_cached(&self) -> Option<Vec<CompanySearchProfile>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.cache_ttl)
            .map(|cached| cached.profiles.clone())
    }
}

#[async_trait]
impl BaseProfileDirectory for HttpProfileDirectory {
    async fn get_all_search_profiles(
        &self,
    ) -> Result<Vec<CompanySearchProfile>, DirectoryError> {
        if let Some(profiles) = self.fresh_cached().await {
            return Ok(profiles);
        }

        // Fetch without holding the lock; the cache is written in one atomic
        // swap afterwards. Concurrent misses may fetch in parallel, which is
        // bounded by the burst size and preferable to a lock across I/O.
        match self.fetch().await {
            Ok(profiles) => {
                debug!(count = profiles.len(), "refreshed profile directory cache");
                *self.cache.write().await = Some(CachedProfiles {
                    fetched_at: Instant::now(),
                    profiles: profiles.clone(),
                });
                Ok(profiles)
            }
            Err(e) => {
                // Never serve stale profiles on error.
                warn!(error = %e, "profile directory fetch failed, cache invalidated");
                *self.cache.write().await = None;
                Err(e)
            }
        }
    }
}
