//! Packagist Registry adapter
//!
//! Fetches the tagged versions of a package from Packagist.
//! API endpoint: https://repo.packagist.org/p2/{vendor}/{package}.json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Packagist registry base URL
const PACKAGIST_API_URL: &str = "https://repo.packagist.org/p2";

/// Packagist Registry adapter
pub struct PackagistAdapter {
    client: HttpClient,
    base_url: String,
}

/// Composer v2 metadata response
#[derive(Debug, Deserialize)]
struct PackagistResponse {
    /// Version entries keyed by package name
    packages: HashMap<String, Vec<PackageVersion>>,
}

#[derive(Debug, Deserialize)]
struct PackageVersion {
    version: String,
}

impl PackagistAdapter {
    /// Create a new Packagist adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: PACKAGIST_API_URL.to_string(),
        }
    }

    /// Use a private Composer repository instead of Packagist
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build the URL for a package
    /// Package names are in the format vendor/package
    fn build_url(&self, package: &str) -> Result<String, RegistryError> {
        match package.split_once('/') {
            Some((vendor, name)) if !vendor.is_empty() && !name.is_empty() => {
                Ok(format!("{}/{}.json", self.base_url, package))
            }
            _ => Err(RegistryError::invalid_package_name(
                package,
                self.registry_name(),
                "expected format 'vendor/package'",
            )),
        }
    }
}

/// Pick the entry for the requested package out of the metadata response
fn into_release_set(
    response: PackagistResponse,
    package: &str,
    registry: &str,
) -> Result<ReleaseSet, RegistryError> {
    let (name, versions) = response
        .packages
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(package))
        .ok_or_else(|| RegistryError::package_not_found(package, registry))?;

    // Branch aliases (dev-main, 2.x-dev) are not releases
    let releases = versions
        .into_iter()
        .map(|v| v.version)
        .filter(|v| !v.starts_with("dev-") && !v.ends_with("-dev"))
        .collect();

    Ok(ReleaseSet::new(name, releases))
}

#[async_trait]
impl RegistryAdapter for PackagistAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Packagist
    }

    async fn fetch_releases(&self, package: &str) -> Result<ReleaseSet, RegistryError> {
        let url = self.build_url(package)?;
        let response: PackagistResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        into_release_set(response, package, self.registry_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PackagistAdapter {
        PackagistAdapter::new(HttpClient::new().unwrap())
    }

    #[test]
    fn test_packagist_adapter_registry_name() {
        assert_eq!(adapter().registry_name(), "Packagist");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            adapter().build_url("laravel/framework").unwrap(),
            "https://repo.packagist.org/p2/laravel/framework.json"
        );
    }

    #[test]
    fn test_build_url_invalid_format() {
        assert!(adapter().build_url("laravel").is_err());
        assert!(adapter().build_url("/framework").is_err());
    }

    #[test]
    fn test_into_release_set() {
        let json = r#"{
            "minified": "composer/2.0",
            "packages": {
                "monolog/monolog": [
                    {"version": "3.5.0", "version_normalized": "3.5.0.0", "require": {"php": ">=8.1"}},
                    {"version": "3.4.0", "version_normalized": "3.4.0.0"},
                    {"version": "dev-main"},
                    {"version": "2.x-dev"}
                ]
            }
        }"#;
        let response: PackagistResponse = serde_json::from_str(json).unwrap();
        let set = into_release_set(response, "Monolog/Monolog", "Packagist").unwrap();
        assert_eq!(set.name, "monolog/monolog");
        assert_eq!(set.releases, vec!["3.5.0", "3.4.0"]);
    }

    #[test]
    fn test_into_release_set_missing_package() {
        let response: PackagistResponse =
            serde_json::from_str(r#"{"packages": {}}"#).unwrap();
        let err = into_release_set(response, "acme/missing", "Packagist").unwrap_err();
        assert!(err.is_not_found());
    }
}
