//! CLI argument parsing module for depsolve

use crate::config::Config;
use crate::error::ConfigError;
use crate::output::Verbosity;
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Parse a strictly positive integer
fn parse_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}

/// Resolve dependency constraints to concrete registry releases
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depsolve",
    version,
    about = "Resolve dependency constraints to concrete registry releases"
)]
pub struct CliArgs {
    /// Target ecosystem (npm, pypi, cargo, rubygems, packagist, maven, go)
    pub ecosystem: String,

    /// Dependency specifiers, e.g. "requests >=2.28,<3"
    #[arg(required = true)]
    pub specs: Vec<String>,

    // Resolution options
    /// Report every matching release instead of only the highest
    #[arg(short, long)]
    pub all_versions: bool,

    /// Skip packages without releases instead of failing
    #[arg(short, long)]
    pub graceful: bool,

    /// Print the tightened constraint set instead of resolving
    #[arg(long)]
    pub restrict: bool,

    // Release source
    /// Read releases from a JSON index file instead of the registry
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,

    /// Configuration file (default: ./depsolve.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum concurrent registry requests (overrides config)
    #[arg(long, value_parser = parse_positive)]
    pub concurrency: Option<usize>,

    /// Registry request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS", value_parser = parse_positive)]
    pub timeout: Option<usize>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Reject option combinations that cannot be honored together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbose && self.quiet {
            return Err(ConfigError::ConflictingOptions {
                message: "--verbose and --quiet cannot be used together".to_string(),
            });
        }
        if self.restrict && (self.all_versions || self.graceful || self.index.is_some()) {
            return Err(ConfigError::ConflictingOptions {
                message: "--restrict does not resolve releases; drop --all-versions, --graceful and --index"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Log level selected by --verbose / --quiet
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::WARN
        }
    }

    /// Text output detail selected by --verbose / --quiet
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(concurrency) = self.concurrency {
            config.http.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout as u64;
        }
        config
    }
}
