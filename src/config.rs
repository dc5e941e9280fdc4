//! Configuration file support (depsolve.toml)
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! max_retries = 3
//! user_agent = "my-tool/1.0"
//! concurrency = 10
//!
//! [registries]
//! npm = "https://registry.npmmirror.com"
//! pypi = "https://pypi.internal.example/pypi"
//! ```

use crate::domain::Ecosystem;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "depsolve.toml";

/// Default timeout for registry requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default number of concurrent registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("depsolve/", env!("CARGO_PKG_VERSION"));

/// The main configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP client settings
    pub http: HttpConfig,

    /// Registry base-URL overrides
    pub registries: RegistryUrls,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
    /// Maximum number of packages fetched at once
    pub concurrency: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl HttpConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-ecosystem registry base URLs; unset entries use the public registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryUrls {
    pub npm: Option<String>,
    pub pypi: Option<String>,
    pub cargo: Option<String>,
    pub rubygems: Option<String>,
    pub packagist: Option<String>,
    pub maven: Option<String>,
    pub go: Option<String>,
}

impl RegistryUrls {
    /// Returns the override for an ecosystem, without a trailing slash
    pub fn url_for(&self, ecosystem: Ecosystem) -> Option<&str> {
        let url = match ecosystem {
            Ecosystem::Npm => &self.npm,
            Ecosystem::PyPI => &self.pypi,
            Ecosystem::Cargo => &self.cargo,
            Ecosystem::RubyGems => &self.rubygems,
            Ecosystem::Packagist => &self.packagist,
            Ecosystem::Maven => &self.maven,
            Ecosystem::Go => &self.go,
        };
        url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load the explicit config file, or depsolve.toml from `dir` if present
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "http.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.http.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "http.concurrency",
                "must be at least 1",
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "http.user_agent",
                "must not be empty",
            ));
        }
        for ecosystem in Ecosystem::all() {
            if let Some(url) = self.registries.url_for(*ecosystem) {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::invalid_value(
                        format!("registries.{}", ecosystem.identifier()),
                        format!("'{}' is not an http(s) URL", url),
                    ));
                }
            }
        }
        Ok(())
    }
}
