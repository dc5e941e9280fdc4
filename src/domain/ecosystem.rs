//! Package ecosystem definitions

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// npm registry (package.json)
    Npm,
    /// Python Package Index (pyproject.toml, requirements.txt)
    PyPI,
    /// crates.io (Cargo.toml)
    Cargo,
    /// RubyGems (Gemfile)
    RubyGems,
    /// Packagist (composer.json)
    Packagist,
    /// Maven Central (group:artifact coordinates)
    Maven,
    /// Go module proxy (go.mod)
    Go,
}

/// Version-range grammar family used by an ecosystem's manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// Comma-separated clauses forming one AND group (`foo >=1.0,<2.0`)
    RangeGrammar,
    /// `||`-separated alternatives of whitespace-joined bounds (`>=1.0.0 <2.0.0 || ^3.0.0`)
    RangeList,
    /// Exact pins only (`foo 1.2.3`)
    NoRange,
}

impl Ecosystem {
    /// Returns the grammar family for this ecosystem
    pub fn grammar(&self) -> Grammar {
        match self {
            Ecosystem::PyPI | Ecosystem::Cargo | Ecosystem::RubyGems => Grammar::RangeGrammar,
            Ecosystem::Npm | Ecosystem::Packagist => Grammar::RangeList,
            Ecosystem::Maven | Ecosystem::Go => Grammar::NoRange,
        }
    }

    /// Returns the canonical identifier for this ecosystem
    pub fn identifier(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPI => "pypi",
            Ecosystem::Cargo => "cargo",
            Ecosystem::RubyGems => "rubygems",
            Ecosystem::Packagist => "packagist",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "go",
        }
    }

    /// Returns the name of the default registry backend
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPI => "PyPI",
            Ecosystem::Cargo => "crates.io",
            Ecosystem::RubyGems => "RubyGems",
            Ecosystem::Packagist => "Packagist",
            Ecosystem::Maven => "Maven Central",
            Ecosystem::Go => "Go Proxy",
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPI => "Python",
            Ecosystem::Cargo => "Rust",
            Ecosystem::RubyGems => "Ruby",
            Ecosystem::Packagist => "PHP",
            Ecosystem::Maven => "Java",
            Ecosystem::Go => "Go",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Npm,
            Ecosystem::PyPI,
            Ecosystem::Cargo,
            Ecosystem::RubyGems,
            Ecosystem::Packagist,
            Ecosystem::Maven,
            Ecosystem::Go,
        ]
    }
}

impl FromStr for Ecosystem {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" | "node" | "nodejs" => Ok(Ecosystem::Npm),
            "pypi" | "python" | "pip" => Ok(Ecosystem::PyPI),
            "cargo" | "crates" | "crates.io" | "rust" => Ok(Ecosystem::Cargo),
            "rubygems" | "gem" | "ruby" => Ok(Ecosystem::RubyGems),
            "packagist" | "composer" | "php" => Ok(Ecosystem::Packagist),
            "maven" | "java" => Ok(Ecosystem::Maven),
            "go" | "golang" => Ok(Ecosystem::Go),
            _ => Err(ResolveError::unknown_ecosystem(s)),
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
