//! No-range parser (Maven, Go)
//!
//! These ecosystems pin exact versions: a specifier is exactly
//! `<name> <version>`, e.g. `org.slf4j:slf4j-api 2.0.9` or
//! `github.com/spf13/cobra v1.8.0`.

use crate::domain::{ConstraintModel, Ecosystem, Operator, RangeTerm};
use crate::error::ResolveError;
use crate::parser::{check_version, merge_by_name, ConstraintParser};
use std::collections::BTreeMap;

/// Parser for exact-version specifiers
pub struct NoRangeParser {
    ecosystem: Ecosystem,
}

impl NoRangeParser {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

impl ConstraintParser for NoRangeParser {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    fn parse_spec(&self, raw: &str) -> Result<ConstraintModel, ResolveError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let [name, version] = tokens[..] else {
            return Err(ResolveError::parse(
                raw,
                format!("expected '<name> <version>', got {} token(s)", tokens.len()),
            ));
        };
        check_version(raw, version)?;
        Ok(ConstraintModel::single(name, RangeTerm::exact(version)))
    }

    fn compose(&self, models: &[ConstraintModel]) -> BTreeMap<String, String> {
        merge_by_name(models)
            .into_iter()
            .map(|model| {
                let version = model
                    .terms()
                    .find(|term| term.op == Operator::Equal)
                    .map(|term| term.version.clone())
                    .unwrap_or_default();
                (model.name, version)
            })
            .collect()
    }

    /// Returned unchanged: exact pins have nothing to tighten
    fn restrict(&self, models: &[ConstraintModel]) -> Vec<ConstraintModel> {
        models.to_vec()
    }
}
