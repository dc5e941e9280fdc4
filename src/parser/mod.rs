//! Dependency specifier parsers for different package ecosystems
//!
//! This module provides one parser per grammar family:
//! - Range grammar: PyPI, crates.io, RubyGems (`foo >=1.0,<2.0`)
//! - Range list: npm, Packagist (`foo >=1.0.0 <2.0.0 || ^3.0.0`)
//! - No range: Maven, Go (`foo 1.2.3`)

mod bounds;
mod no_range;
mod normalizer;
mod range;
mod range_list;
mod restrict;

pub use no_range::NoRangeParser;
pub use normalizer::{
    ComposerRangeNormalizer, NpmRangeNormalizer, RangeNormalizer, UnsupportedRange,
};
pub use range::{RangeDialect, RangeGrammarParser};
pub use range_list::RangeListParser;

use crate::domain::{ConstraintGroup, ConstraintModel, Ecosystem, Operator, RangeTerm};
use crate::error::ResolveError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// A version token as it may appear after an operator
static VERSION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z.+_\-]*$").unwrap());
static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(>=|<=|==|!=|>|<|=)?(.+)$").unwrap());

/// Trait for parsing dependency specifiers into constraint models
pub trait ConstraintParser: Send + Sync {
    /// Returns the ecosystem this parser handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parse a single specifier such as `foo >=1.0,<2.0`
    fn parse_spec(&self, raw: &str) -> Result<ConstraintModel, ResolveError>;

    /// Parse a list of specifiers; the first invalid one aborts the call
    fn parse(&self, raw_specs: &[String]) -> Result<Vec<ConstraintModel>, ResolveError> {
        raw_specs.iter().map(|raw| self.parse_spec(raw)).collect()
    }

    /// Render models back to specifier strings keyed by package name
    fn compose(&self, models: &[ConstraintModel]) -> BTreeMap<String, String>;

    /// Collapse the constraints of each package into the tightest equivalent set
    fn restrict(&self, models: &[ConstraintModel]) -> Vec<ConstraintModel>;
}

/// Get a constraint parser for the specified ecosystem
pub fn get_parser(ecosystem: Ecosystem) -> Box<dyn ConstraintParser> {
    match ecosystem {
        Ecosystem::PyPI => Box::new(RangeGrammarParser::new(RangeDialect::Pep440)),
        Ecosystem::Cargo => Box::new(RangeGrammarParser::new(RangeDialect::Cargo)),
        Ecosystem::RubyGems => Box::new(RangeGrammarParser::new(RangeDialect::Gem)),
        Ecosystem::Npm => Box::new(RangeListParser::npm()),
        Ecosystem::Packagist => Box::new(RangeListParser::composer()),
        Ecosystem::Maven => Box::new(NoRangeParser::new(Ecosystem::Maven)),
        Ecosystem::Go => Box::new(NoRangeParser::new(Ecosystem::Go)),
    }
}

/// Check that a version token is well-formed
pub(crate) fn check_version(spec: &str, version: &str) -> Result<(), ResolveError> {
    if VERSION_TOKEN_RE.is_match(version) {
        Ok(())
    } else {
        Err(ResolveError::parse(
            spec,
            format!("unparsable version '{}'", version),
        ))
    }
}

/// Parse an already-comparable `<op><version>` token; no operator means exact
pub(crate) fn parse_term(spec: &str, token: &str) -> Result<RangeTerm, ResolveError> {
    let caps = TERM_RE
        .captures(token)
        .ok_or_else(|| ResolveError::parse(spec, "empty range term"))?;
    let op = match caps.get(1) {
        Some(symbol) => Operator::from_symbol(symbol.as_str())
            .ok_or_else(|| ResolveError::parse(spec, format!("invalid operator in '{}'", token)))?,
        None => Operator::Equal,
    };
    let version = &caps[2];
    check_version(spec, version)?;
    Ok(RangeTerm::new(op, version))
}

/// Merge models sharing a package name into one model per name
///
/// Conjunction of two OR-of-AND models is distributed back into OR-of-AND
/// form. Order follows the first appearance of each name.
pub(crate) fn merge_by_name(models: &[ConstraintModel]) -> Vec<ConstraintModel> {
    let mut merged: Vec<ConstraintModel> = Vec::new();
    for model in models {
        match merged.iter_mut().find(|m| m.name == model.name) {
            Some(existing) => existing.groups = conjoin(&existing.groups, &model.groups),
            None => merged.push(model.clone()),
        }
    }
    merged
}

fn conjoin(left: &[ConstraintGroup], right: &[ConstraintGroup]) -> Vec<ConstraintGroup> {
    let mut groups = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            let terms: Vec<RangeTerm> = l.terms().iter().chain(r.terms()).cloned().collect();
            groups.push(ConstraintGroup::from_terms(terms));
        }
    }
    groups
}
