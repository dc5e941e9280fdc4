//! Resolution results
//!
//! A resolution maps every requested package to the release(s) that satisfy
//! its constraint. Packages skipped in graceful mode are reported separately
//! and never appear in the entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved release(s) for one package
///
/// Serializes as a plain string, a list of strings, or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedEntry {
    /// Highest satisfying release
    Latest(String),
    /// Every satisfying release, ascending
    All(Vec<String>),
    /// Releases exist but none satisfy the constraint
    Unmatched,
}

impl ResolvedEntry {
    /// Build an entry from releases already sorted ascending
    pub fn from_sorted(mut matching: Vec<String>, all_versions: bool) -> Self {
        if matching.is_empty() {
            ResolvedEntry::Unmatched
        } else if all_versions {
            ResolvedEntry::All(matching)
        } else {
            // Non-empty, checked above
            ResolvedEntry::Latest(matching.pop().unwrap_or_default())
        }
    }

    /// Returns the highest resolved version, if any
    pub fn version(&self) -> Option<&str> {
        match self {
            ResolvedEntry::Latest(version) => Some(version),
            ResolvedEntry::All(versions) => versions.last().map(String::as_str),
            ResolvedEntry::Unmatched => None,
        }
    }

    /// Returns every resolved version
    pub fn versions(&self) -> Vec<&str> {
        match self {
            ResolvedEntry::Latest(version) => vec![version.as_str()],
            ResolvedEntry::All(versions) => versions.iter().map(String::as_str).collect(),
            ResolvedEntry::Unmatched => Vec::new(),
        }
    }

    /// Returns true if at least one release matched
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ResolvedEntry::Unmatched)
    }
}

/// A package left out of the resolution in graceful mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPackage {
    /// Package name as requested
    pub name: String,
    /// Why no releases were available
    pub reason: String,
}

impl SkippedPackage {
    /// Creates a new SkippedPackage
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result of one solve call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Resolved entries keyed by canonical package name
    pub entries: BTreeMap<String, ResolvedEntry>,
    /// Packages omitted because no releases could be fetched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedPackage>,
}

impl Resolution {
    /// Create an empty resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry of a package
    pub fn get(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries.get(name)
    }

    /// Returns true if the package was resolved in this call
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of resolved entries (matched or not)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with at least one matching release
    pub fn matched_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_resolved()).count()
    }
}
