//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ResolveError: Issues with parsing constraints and solving them
//! - RegistryError: Issues with fetching releases from a package registry
//! - ConfigError: Issues with configuration files and CLI options

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Constraint parsing and resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while parsing or solving dependency constraints
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A specifier does not match the ecosystem's grammar
    #[error("invalid dependency specification '{spec}': {message}")]
    Parse { spec: String, message: String },

    /// The same canonical package was requested more than once
    #[error("duplicate dependency '{package}': declared more than once")]
    DuplicateDependency { package: String },

    /// No releases could be found for a package
    #[error("no releases found for package '{package}'")]
    UnresolvedPackage {
        package: String,
        #[source]
        source: Option<RegistryError>,
    },

    /// The ecosystem identifier is not recognized
    #[error(
        "unknown ecosystem '{value}': expected one of npm, pypi, cargo, rubygems, packagist, maven, go"
    )]
    UnknownEcosystem { value: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Package name rejected before any request was made
    #[error("invalid package name '{name}' for {registry}: {reason}")]
    InvalidPackageName {
        name: String,
        registry: String,
        reason: String,
    },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has unexpected keys
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A configuration value is out of range
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Release index file could not be loaded
    #[error("failed to load release index {path}: {message}")]
    InvalidIndex { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ResolveError {
    /// Creates a new Parse error
    pub fn parse(spec: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::Parse {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Creates a new DuplicateDependency error
    pub fn duplicate(package: impl Into<String>) -> Self {
        ResolveError::DuplicateDependency {
            package: package.into(),
        }
    }

    /// Creates a new UnresolvedPackage error
    pub fn unresolved(package: impl Into<String>, source: Option<RegistryError>) -> Self {
        ResolveError::UnresolvedPackage {
            package: package.into(),
            source,
        }
    }

    /// Creates a new UnknownEcosystem error
    pub fn unknown_ecosystem(value: impl Into<String>) -> Self {
        ResolveError::UnknownEcosystem {
            value: value.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidPackageName error
    pub fn invalid_package_name(
        name: impl Into<String>,
        registry: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidPackageName {
            name: name.into(),
            registry: registry.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if the registry reported the package as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::PackageNotFound { .. })
    }

    /// Rejects blank package names before they reach a registry
    pub fn check_name(name: &str, registry: &str) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(Self::invalid_package_name(
                name,
                registry,
                "package name must not be blank",
            ));
        }
        Ok(())
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidIndex error
    pub fn invalid_index(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidIndex {
            path: path.into(),
            message: message.into(),
        }
    }
}
