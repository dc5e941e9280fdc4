//! crates.io API adapter
//!
//! Fetches the published versions of a crate from crates.io.
//! API endpoint: https://crates.io/api/v1/crates/{crate}
//!
//! Note: crates.io requires a User-Agent header (handled by HttpClient)
//! and has rate limiting (1 request/second).

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::time::{Duration, Instant};

/// crates.io API base URL
const CRATES_IO_API_URL: &str = "https://crates.io/api/v1/crates";

/// Rate limit: 1 request per second
const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);

/// crates.io adapter with rate limiting
pub struct CratesIoAdapter {
    client: HttpClient,
    base_url: String,
    rate_limiter: Semaphore,
    last_request: Mutex<Option<Instant>>,
}

/// crates.io crate response
#[derive(Debug, Deserialize)]
struct CratesIoResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
    versions: Vec<CrateVersion>,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    name: String,
}

/// Crate version information
#[derive(Debug, Deserialize)]
struct CrateVersion {
    /// Version number
    num: String,
    /// Whether this version is yanked
    yanked: bool,
}

impl CratesIoAdapter {
    /// Create a new crates.io adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: CRATES_IO_API_URL.to_string(),
            rate_limiter: Semaphore::new(1),
            last_request: Mutex::new(None),
        }
    }

    /// Use an alternative registry API instead of crates.io
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build the URL for a crate
    fn build_url(&self, crate_name: &str) -> String {
        format!("{}/{}", self.base_url, crate_name)
    }

    /// Apply rate limiting before making a request
    async fn apply_rate_limit(&self) {
        // The semaphore is never closed, so acquiring cannot fail
        let _permit = self.rate_limiter.acquire().await;

        let elapsed = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|t| t.elapsed());

        if let Some(elapsed) = elapsed {
            if elapsed < RATE_LIMIT_INTERVAL {
                tokio::time::sleep(RATE_LIMIT_INTERVAL - elapsed).await;
            }
        }

        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }
}

#[async_trait]
impl RegistryAdapter for CratesIoAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    async fn fetch_releases(&self, crate_name: &str) -> Result<ReleaseSet, RegistryError> {
        self.apply_rate_limit().await;

        let url = self.build_url(crate_name);
        let response: CratesIoResponse = self
            .client
            .get_json(&url, crate_name, self.registry_name())
            .await?;

        let releases = response
            .versions
            .into_iter()
            .filter(|v| !v.yanked)
            .map(|v| v.num)
            .collect();

        Ok(ReleaseSet::new(response.krate.name, releases))
    }
}
