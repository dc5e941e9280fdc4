//! Ecosystem registry
//!
//! Maps an ecosystem identifier to its parser and default release source.
//! The ecosystem is chosen once; the returned backend is used for the whole run.

use crate::config::{Config, RegistryUrls};
use crate::domain::Ecosystem;
use crate::error::{AppError, ResolveError};
use crate::parser::{get_parser, ConstraintParser};
use crate::registry::{create_adapter, HttpClient, RegistryAdapter};
use crate::solver::ConstraintSolver;

/// Parser and default registry adapter of one ecosystem
pub struct Backend {
    pub ecosystem: Ecosystem,
    pub parser: Box<dyn ConstraintParser>,
    pub adapter: Box<dyn RegistryAdapter>,
}

impl Backend {
    /// Split into a solver and the adapter feeding it
    pub fn into_parts(self) -> (ConstraintSolver, Box<dyn RegistryAdapter>) {
        (ConstraintSolver::new(self.parser), self.adapter)
    }
}

/// Lookup table from ecosystem identifiers to backends
pub struct EcosystemRegistry {
    client: HttpClient,
    urls: RegistryUrls,
}

impl EcosystemRegistry {
    /// Create a registry sharing one HTTP client across adapters
    pub fn new(client: HttpClient, urls: RegistryUrls) -> Self {
        Self { client, urls }
    }

    /// Create a registry from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = HttpClient::from_config(&config.http)?;
        Ok(Self::new(client, config.registries.clone()))
    }

    /// Look up a backend by identifier (`npm`, `python`, `crates.io`, ...)
    pub fn lookup(&self, identifier: &str) -> Result<Backend, ResolveError> {
        let ecosystem: Ecosystem = identifier.parse()?;
        Ok(self.backend(ecosystem))
    }

    /// Build the backend of a known ecosystem
    pub fn backend(&self, ecosystem: Ecosystem) -> Backend {
        Backend {
            ecosystem,
            parser: get_parser(ecosystem),
            adapter: create_adapter(ecosystem, self.client.clone(), &self.urls),
        }
    }
}
