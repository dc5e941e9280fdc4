//! depsolve - dependency constraint resolution library
//!
//! Parses dependency specifiers of several package ecosystems into a common
//! constraint model, tightens them, and resolves them against the releases a
//! registry (or an offline index) lists:
//! - npm, Packagist
//! - PyPI, crates.io, RubyGems
//! - Maven Central, Go module proxy

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod solver;
