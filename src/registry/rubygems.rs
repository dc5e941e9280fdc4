//! RubyGems Registry adapter
//!
//! Fetches the published versions of a gem from RubyGems.
//! API endpoint: https://rubygems.org/api/v1/versions/{gem}.json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;
use serde::Deserialize;

/// RubyGems registry base URL
const RUBYGEMS_API_URL: &str = "https://rubygems.org/api/v1/versions";

/// RubyGems Registry adapter
pub struct RubyGemsAdapter {
    client: HttpClient,
    base_url: String,
}

/// One entry of the versions response
#[derive(Debug, Deserialize)]
struct GemVersion {
    number: String,
}

impl RubyGemsAdapter {
    /// Create a new RubyGems adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: RUBYGEMS_API_URL.to_string(),
        }
    }

    /// Use a mirror instead of rubygems.org
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build the URL for a gem
    fn build_url(&self, gem: &str) -> String {
        format!("{}/{}.json", self.base_url, gem)
    }
}

/// Version numbers in response order; platform-specific builds repeat a number
fn distinct_numbers(versions: Vec<GemVersion>) -> Vec<String> {
    let mut numbers: Vec<String> = Vec::with_capacity(versions.len());
    for version in versions {
        if !numbers.contains(&version.number) {
            numbers.push(version.number);
        }
    }
    numbers
}

#[async_trait]
impl RegistryAdapter for RubyGemsAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
    }

    async fn fetch_releases(&self, gem: &str) -> Result<ReleaseSet, RegistryError> {
        let url = self.build_url(gem);
        let versions: Vec<GemVersion> = self
            .client
            .get_json(&url, gem, self.registry_name())
            .await?;

        // The versions endpoint does not echo the gem name
        Ok(ReleaseSet::new(gem, distinct_numbers(versions)))
    }
}
