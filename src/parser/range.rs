//! Range-grammar parser (PyPI, crates.io, RubyGems)
//!
//! Specifiers are a package name followed by comma-separated clauses that
//! must all hold, e.g. `requests >=2.28,<3`, `serde ^1.0`, `rails ~> 7.0`.
//! Each clause becomes one term; dialect shorthands expand to two:
//! - PEP 440: `~=1.4.5` → `>=1.4.5,<1.5`, `==1.4.*` → `>=1.4,<1.5`
//! - Cargo: bare and `^` versions are caret ranges, `~` is a tilde range
//! - Gem: `~> 1.2` → `>=1.2,<2`

use crate::domain::{ConstraintGroup, ConstraintModel, Ecosystem, Operator, RangeTerm};
use crate::error::ResolveError;
use crate::parser::bounds::{self, ComponentOverflow, PartialVersion};
use crate::parser::{check_version, merge_by_name, ConstraintParser};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Package name, optional [extras], then the clause list
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._\-]*)\s*(?:\[[^\]]*\])?\s*(.*)$").unwrap()
});
static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(===|~=|~>|==|!=|>=|<=|>|<|=|\^|~)?\s*(\S+)$").unwrap()
});

/// Version-range dialect of a range-grammar ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDialect {
    /// Python (PEP 440, plus Poetry `^`/`~`)
    Pep440,
    /// Rust (Cargo semver requirements)
    Cargo,
    /// Ruby (RubyGems requirements)
    Gem,
}

impl RangeDialect {
    /// Returns the ecosystem that writes this dialect
    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            RangeDialect::Pep440 => Ecosystem::PyPI,
            RangeDialect::Cargo => Ecosystem::Cargo,
            RangeDialect::Gem => Ecosystem::RubyGems,
        }
    }

    /// Expand one clause into the terms it stands for
    fn clause(&self, spec: &str, op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
        match self {
            RangeDialect::Pep440 => pep440_clause(spec, op, version),
            RangeDialect::Cargo => cargo_clause(spec, op, version),
            RangeDialect::Gem => gem_clause(spec, op, version),
        }
    }

    /// Render a term the way the dialect writes it
    fn render(&self, term: &RangeTerm) -> String {
        match (self, term.op) {
            (RangeDialect::Pep440, Operator::Equal) => format!("=={}", term.version),
            _ => term.to_string(),
        }
    }
}

/// Parser for comma-separated range clauses
pub struct RangeGrammarParser {
    dialect: RangeDialect,
}

impl RangeGrammarParser {
    /// Create a parser for the given dialect
    pub fn new(dialect: RangeDialect) -> Self {
        Self { dialect }
    }

    /// Returns the dialect of this parser
    pub fn dialect(&self) -> RangeDialect {
        self.dialect
    }
}

impl ConstraintParser for RangeGrammarParser {
    fn ecosystem(&self) -> Ecosystem {
        self.dialect.ecosystem()
    }

    fn parse_spec(&self, raw: &str) -> Result<ConstraintModel, ResolveError> {
        // Environment markers (`; python_version < "3.8"`) do not constrain versions
        let trimmed = raw.split(';').next().unwrap_or_default().trim();
        let caps = NAME_RE
            .captures(trimmed)
            .ok_or_else(|| ResolveError::parse(raw, "expected a package name"))?;
        let name = &caps[1];
        let clauses = caps[2].trim();

        if clauses.is_empty() || clauses == "*" {
            return Ok(ConstraintModel::any_version(name));
        }

        let mut terms = Vec::new();
        for clause in clauses.split(',') {
            let clause = clause.trim();
            if clause.is_empty() {
                return Err(ResolveError::parse(raw, "empty version clause"));
            }
            let caps = CLAUSE_RE
                .captures(clause)
                .ok_or_else(|| ResolveError::parse(raw, format!("invalid clause '{}'", clause)))?;
            let op = caps.get(1).map(|m| m.as_str());
            terms.extend(self.dialect.clause(raw, op, &caps[2])?);
        }

        Ok(ConstraintModel::new(
            name,
            vec![ConstraintGroup::from_terms(terms)],
        ))
    }

    fn compose(&self, models: &[ConstraintModel]) -> BTreeMap<String, String> {
        // The grammar has no OR: every group's terms are written as one clause list
        merge_by_name(models)
            .into_iter()
            .map(|model| {
                let specifier = model
                    .terms()
                    .map(|term| self.dialect.render(term))
                    .collect::<Vec<_>>()
                    .join(",");
                (model.name, specifier)
            })
            .collect()
    }

    /// Clauses are not intersected here; the models come back unchanged
    fn restrict(&self, models: &[ConstraintModel]) -> Vec<ConstraintModel> {
        models.to_vec()
    }
}

fn pep440_clause(spec: &str, op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    match op {
        Some("~=") => {
            if bounds::release_segments(version).len() < 2 {
                return Err(ResolveError::parse(
                    spec,
                    format!("'~={}' needs at least two release segments", version),
                ));
            }
            check_version(spec, version)?;
            pessimistic(spec, version)
        }
        Some("==") | Some("===") | Some("=") | None => match version.strip_suffix(".*") {
            Some(prefix) => prefix_match(spec, prefix),
            None => {
                check_version(spec, version)?;
                Ok(vec![RangeTerm::exact(version)])
            }
        },
        Some("!=") if version.ends_with(".*") => Err(ResolveError::parse(
            spec,
            format!("wildcard exclusion '!={}' is not supported", version),
        )),
        Some("^") | Some("~") => cargo_clause(spec, op, version),
        Some(symbol) => plain(spec, symbol, version),
    }
}

fn cargo_clause(spec: &str, op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    let partial = PartialVersion::parse(version)
        .ok_or_else(|| ResolveError::parse(spec, format!("unparsable version '{}'", version)))?;

    let terms = match op {
        None | Some("^") if partial.major.is_none() || bounds::has_wildcard(version) => {
            bounds::x_range(&partial)
        }
        None | Some("^") => bounds::caret(&partial),
        Some("~") => bounds::tilde(&partial),
        Some("=") | Some("==") => bounds::x_range(&partial),
        Some(symbol) => match Operator::from_symbol(symbol) {
            Some(op) => bounds::comparison(op, &partial),
            None => return Err(unsupported(spec, symbol)),
        },
    };
    terms.map_err(|e| overflow(spec, e))
}

fn gem_clause(spec: &str, op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    match op {
        Some("~>") => {
            check_version(spec, version)?;
            pessimistic(spec, version)
        }
        None => {
            check_version(spec, version)?;
            Ok(vec![RangeTerm::exact(version)])
        }
        Some(symbol) => plain(spec, symbol, version),
    }
}

/// `>=version` plus the pessimistic upper bound
fn pessimistic(spec: &str, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    let upper = bounds::pessimistic_upper(version)
        .map_err(|e| overflow(spec, e))?
        .ok_or_else(|| ResolveError::parse(spec, format!("unparsable version '{}'", version)))?;
    Ok(vec![
        RangeTerm::new(Operator::GreaterOrEqual, version),
        RangeTerm::new(Operator::Less, upper),
    ])
}

/// `==1.4.*` → `>=1.4`, `<1.5`
fn prefix_match(spec: &str, prefix: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    let segments = bounds::release_segments(prefix);
    let rendered = segments
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".");
    if segments.is_empty() || rendered != prefix {
        return Err(ResolveError::parse(
            spec,
            format!("invalid wildcard version '{}.*'", prefix),
        ));
    }
    let upper = bounds::bump_last(&segments).map_err(|e| overflow(spec, e))?;
    Ok(vec![
        RangeTerm::new(Operator::GreaterOrEqual, prefix),
        RangeTerm::new(Operator::Less, upper),
    ])
}

/// A clause using one of the plain comparison operators
fn plain(spec: &str, symbol: &str, version: &str) -> Result<Vec<RangeTerm>, ResolveError> {
    let op = Operator::from_symbol(symbol).ok_or_else(|| unsupported(spec, symbol))?;
    check_version(spec, version)?;
    Ok(vec![RangeTerm::new(op, version)])
}

fn unsupported(spec: &str, symbol: &str) -> ResolveError {
    ResolveError::parse(spec, format!("operator '{}' is not supported here", symbol))
}

fn overflow(spec: &str, err: ComponentOverflow) -> ResolveError {
    ResolveError::parse(spec, err.to_string())
}
