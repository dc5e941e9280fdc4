//! In-memory release index
//!
//! Serves releases from memory: test fixtures, offline JSON index files
//! (`{"requests": ["2.31.0", "2.32.3"]}`) and results collected by the
//! `Prefetcher`. Lookups try the exact name first, then the normalized name.

use crate::error::{ConfigError, RegistryError};
use crate::registry::{normalize_name, ReleaseFetcher, ReleaseSet};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
enum Entry {
    Found(ReleaseSet),
    Failed(RegistryError),
}

/// Release lookup table implementing `ReleaseFetcher`
#[derive(Debug, Clone)]
pub struct ReleaseIndex {
    registry: String,
    entries: BTreeMap<String, Entry>,
}

impl ReleaseIndex {
    /// Create an empty index; `registry` names the source in errors
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add a package whose canonical name is the name it is stored under
    pub fn with_releases<I, S>(mut self, name: &str, releases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let releases = releases.into_iter().map(Into::into).collect();
        self.insert(name, ReleaseSet::new(name, releases));
        self
    }

    /// Store the result of fetching `requested`
    pub fn insert(&mut self, requested: impl Into<String>, set: ReleaseSet) {
        self.entries.insert(requested.into(), Entry::Found(set));
    }

    /// Store a failed fetch so it is replayed to the solver
    pub fn record_failure(&mut self, requested: impl Into<String>, error: RegistryError) {
        self.entries.insert(requested.into(), Entry::Failed(error));
    }

    /// Parse an index from `{ "name": ["version", ...] }` JSON
    pub fn from_json(registry: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        let packages: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut index = Self::new(registry);
        for (name, releases) in packages {
            let set = ReleaseSet::new(name.clone(), releases);
            index.insert(name, set);
        }
        Ok(index)
    }

    /// Load an index file
    pub fn load(path: &Path, registry: impl Into<String>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::invalid_index(path, e.to_string()))?;
        Self::from_json(registry, &content)
            .map_err(|e| ConfigError::invalid_index(path, e.to_string()))
    }

    /// Number of stored packages, failures included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, package: &str) -> Option<&Entry> {
        self.entries.get(package).or_else(|| {
            let normalized = normalize_name(package);
            self.entries
                .iter()
                .find(|(name, _)| normalize_name(name) == normalized)
                .map(|(_, entry)| entry)
        })
    }
}

impl ReleaseFetcher for ReleaseIndex {
    fn fetch(&self, package: &str) -> Result<ReleaseSet, RegistryError> {
        RegistryError::check_name(package, &self.registry)?;

        match self.lookup(package) {
            Some(Entry::Found(set)) => Ok(set.clone()),
            Some(Entry::Failed(error)) => Err(error.clone()),
            None => Err(RegistryError::package_not_found(package, &self.registry)),
        }
    }
}
