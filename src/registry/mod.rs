//! Release sources for the constraint solver
//!
//! This module provides:
//! - `ReleaseFetcher`: the synchronous lookup the solver consumes
//! - `ReleaseIndex`: in-memory fetcher (fixtures, offline index files, prefetched data)
//! - `RegistryAdapter`: async adapters for each public registry over a shared HTTP client
//! - `Prefetcher`: concurrent population of a `ReleaseIndex` from an adapter

mod client;
mod crates_io;
mod go_proxy;
mod index;
mod maven_central;
mod npm;
mod packagist;
mod prefetch;
mod pypi;
mod rubygems;

pub use client::HttpClient;
pub use crates_io::CratesIoAdapter;
pub use go_proxy::GoProxyAdapter;
pub use index::ReleaseIndex;
pub use maven_central::MavenCentralAdapter;
pub use npm::NpmAdapter;
pub use packagist::PackagistAdapter;
pub use prefetch::Prefetcher;
pub use pypi::PyPIAdapter;
pub use rubygems::RubyGemsAdapter;

use crate::config::RegistryUrls;
use crate::domain::Ecosystem;
use crate::error::RegistryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Releases published for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSet {
    /// Name as the registry spells it
    pub name: String,
    /// Published versions, in registry order
    pub releases: Vec<String>,
}

impl ReleaseSet {
    pub fn new(name: impl Into<String>, releases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            releases,
        }
    }
}

/// Synchronous release lookup used by the solver
pub trait ReleaseFetcher: Send + Sync {
    /// Fetch the canonical name and known releases of a package
    fn fetch(&self, package: &str) -> Result<ReleaseSet, RegistryError>;
}

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the ecosystem this adapter serves
    fn ecosystem(&self) -> Ecosystem;

    /// Get the registry name
    fn registry_name(&self) -> &'static str {
        self.ecosystem().registry_name()
    }

    /// Fetch the releases of a package exactly as named
    async fn fetch_releases(&self, package: &str) -> Result<ReleaseSet, RegistryError>;
}

/// Normalize a package name for fallback lookups
///
/// Lowercases and maps `_` and `.` to `-`, so `Flask_SQLAlchemy` and
/// `flask-sqlalchemy` meet. Scope and path separators are kept.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Fetch releases, retrying once with the normalized name when not found
pub async fn fetch_with_fallback(
    adapter: &dyn RegistryAdapter,
    package: &str,
) -> Result<ReleaseSet, RegistryError> {
    RegistryError::check_name(package, adapter.registry_name())?;

    match adapter.fetch_releases(package).await {
        Err(e) if e.is_not_found() => {
            let normalized = normalize_name(package);
            if normalized == package {
                return Err(e);
            }
            debug!(package, %normalized, "retrying lookup with normalized name");
            adapter.fetch_releases(&normalized).await
        }
        result => result,
    }
}

/// Create the default registry adapter for the given ecosystem
pub fn create_adapter(
    ecosystem: Ecosystem,
    client: HttpClient,
    urls: &RegistryUrls,
) -> Box<dyn RegistryAdapter> {
    let base_url = urls.url_for(ecosystem);
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmAdapter::new(client).with_base_url(base_url)),
        Ecosystem::PyPI => Box::new(PyPIAdapter::new(client).with_base_url(base_url)),
        Ecosystem::Cargo => Box::new(CratesIoAdapter::new(client).with_base_url(base_url)),
        Ecosystem::RubyGems => Box::new(RubyGemsAdapter::new(client).with_base_url(base_url)),
        Ecosystem::Packagist => Box::new(PackagistAdapter::new(client).with_base_url(base_url)),
        Ecosystem::Maven => Box::new(MavenCentralAdapter::new(client).with_base_url(base_url)),
        Ecosystem::Go => Box::new(GoProxyAdapter::new(client).with_base_url(base_url)),
    }
}
