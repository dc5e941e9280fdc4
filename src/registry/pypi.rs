//! PyPI JSON API adapter
//!
//! Fetches the released versions of a project from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI project metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: ProjectInfo,
    /// Release files keyed by version
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    name: String,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    #[serde(default)]
    yanked: bool,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: PYPI_API_URL.to_string(),
        }
    }

    /// Use a mirror instead of pypi.org
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

/// Versions with at least one file that is not yanked
fn available_versions(releases: HashMap<String, Vec<ReleaseFile>>) -> Vec<String> {
    releases
        .into_iter()
        .filter(|(_, files)| files.is_empty() || files.iter().any(|f| !f.yanked))
        .map(|(version, _)| version)
        .collect()
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::PyPI
    }

    async fn fetch_releases(&self, package: &str) -> Result<ReleaseSet, RegistryError> {
        let url = self.build_url(package);
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(ReleaseSet::new(
            response.info.name,
            available_versions(response.releases),
        ))
    }
}
