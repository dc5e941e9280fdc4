//! depsolve - resolve dependency constraints to concrete registry releases
//!
//! Supported ecosystems:
//! - npm, Packagist (range lists with `||`)
//! - PyPI, crates.io, RubyGems (comma-separated range clauses)
//! - Maven Central, Go module proxy (exact pins)

use clap::Parser;
use depsolve::cli::CliArgs;
use depsolve::orchestrator::Orchestrator;
use depsolve::output::formatter_for;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(args.log_level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("depsolve v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Ecosystem: {}", args.ecosystem);
        if let Some(index) = &args.index {
            eprintln!("Index: {}", index.display());
        }
    }

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await?;

    let formatter = formatter_for(&args);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
