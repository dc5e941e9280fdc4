//! Orchestrator for one depsolve run
//!
//! Workflow: look up ecosystem → parse → (restrict | fetch → solve).
//! Registry data is prefetched concurrently before the synchronous solver
//! runs, unless an offline index file is given.

use crate::cli::CliArgs;
use crate::config::Config;
use crate::domain::{ConstraintModel, Ecosystem, Resolution};
use crate::error::AppError;
use crate::registry::{Prefetcher, RegistryAdapter, ReleaseIndex};
use crate::solver::{ConstraintSolver, EcosystemRegistry, SolveOptions};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Releases picked for every package
    Resolved(Resolution),
    /// Tightened specifiers keyed by package name
    Restricted(BTreeMap<String, String>),
}

/// Result of running the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorResult {
    /// Ecosystem the specifiers were resolved in
    pub ecosystem: Ecosystem,
    /// Name of the release source (registry or index)
    pub source: String,
    pub outcome: Outcome,
}

/// Coordinates configuration, fetching and solving for one invocation
pub struct Orchestrator {
    args: CliArgs,
    config: Config,
}

impl Orchestrator {
    /// Create an orchestrator, loading `depsolve.toml` from the working directory
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        args.validate()?;
        let config = Config::load(args.config.as_deref(), Path::new("."))?;
        Ok(Self::with_config(args, config))
    }

    /// Create an orchestrator with an already loaded configuration
    pub fn with_config(args: CliArgs, config: Config) -> Self {
        let config = args.apply_overrides(config);
        Self { args, config }
    }

    /// Run the workflow, showing progress unless quiet or JSON output
    pub async fn run(&self) -> Result<OrchestratorResult, AppError> {
        self.run_with_progress(!self.args.quiet && !self.args.json)
            .await
    }

    /// Run the workflow with optional progress display
    pub async fn run_with_progress(
        &self,
        show_progress: bool,
    ) -> Result<OrchestratorResult, AppError> {
        let registry = EcosystemRegistry::from_config(&self.config)?;
        let backend = registry.lookup(&self.args.ecosystem)?;
        let ecosystem = backend.ecosystem;
        let (solver, adapter) = backend.into_parts();

        let models = solver.parser().parse(&self.args.specs)?;
        debug!(ecosystem = %ecosystem, count = models.len(), "parsed specifiers");

        if self.args.restrict {
            let restricted = solver.parser().restrict(&models);
            return Ok(OrchestratorResult {
                ecosystem,
                source: adapter.registry_name().to_string(),
                outcome: Outcome::Restricted(solver.parser().compose(&restricted)),
            });
        }

        let (index, source) = match &self.args.index {
            Some(path) => {
                info!(path = %path.display(), "using offline release index");
                let index = ReleaseIndex::load(path, adapter.registry_name())?;
                (index, path.display().to_string())
            }
            None => {
                let source = adapter.registry_name().to_string();
                let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
                let index = self.prefetch(adapter, &names, show_progress).await;
                (index, source)
            }
        };

        let resolution = self.solve(&solver, &models, &index)?;
        Ok(OrchestratorResult {
            ecosystem,
            source,
            outcome: Outcome::Resolved(resolution),
        })
    }

    async fn prefetch(
        &self,
        adapter: Box<dyn RegistryAdapter>,
        names: &[String],
        show_progress: bool,
    ) -> ReleaseIndex {
        let prefetcher = Prefetcher::new(adapter, self.config.http.concurrency);
        let (index, summary) = prefetcher.prefetch(names, show_progress).await;
        if summary.failed > 0 {
            warn!(
                fetched = summary.fetched,
                failed = summary.failed,
                "some packages could not be fetched"
            );
        } else {
            info!(fetched = summary.fetched, "fetched all packages");
        }
        index
    }

    fn solve(
        &self,
        solver: &ConstraintSolver,
        models: &[ConstraintModel],
        index: &ReleaseIndex,
    ) -> Result<Resolution, AppError> {
        let options = SolveOptions::new(self.args.graceful, self.args.all_versions);
        Ok(solver.solve_models(models, index, options)?)
    }
}
