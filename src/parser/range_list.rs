//! Range-list parser (npm, Packagist)
//!
//! A specifier is `name <range>` where the range is written in the
//! ecosystem's native syntax, e.g. `lodash ^4.17.0` or
//! `monolog/monolog ^2.0|^3.0`. The range is first normalized into
//! comparable form and then split into OR-groups of AND-terms.

use crate::domain::{ConstraintGroup, ConstraintModel, Ecosystem, RangeTerm};
use crate::error::ResolveError;
use crate::parser::{
    merge_by_name, parse_term, ComposerRangeNormalizer, ConstraintParser, NpmRangeNormalizer,
    RangeNormalizer,
};
use crate::parser::restrict::tighten_bounds;
use std::collections::BTreeMap;

/// Parser for `||`-separated range lists
pub struct RangeListParser {
    ecosystem: Ecosystem,
    normalizer: Box<dyn RangeNormalizer>,
}

impl RangeListParser {
    /// Create a parser with a custom normalizer
    pub fn new(ecosystem: Ecosystem, normalizer: Box<dyn RangeNormalizer>) -> Self {
        Self {
            ecosystem,
            normalizer,
        }
    }

    /// Parser for npm ranges
    pub fn npm() -> Self {
        Self::new(Ecosystem::Npm, Box::new(NpmRangeNormalizer))
    }

    /// Parser for Composer ranges
    pub fn composer() -> Self {
        Self::new(Ecosystem::Packagist, Box::new(ComposerRangeNormalizer))
    }
}

impl ConstraintParser for RangeListParser {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    fn parse_spec(&self, raw: &str) -> Result<ConstraintModel, ResolveError> {
        let trimmed = raw.trim();
        let (name, range) = match trimmed.split_once(char::is_whitespace) {
            Some((name, range)) => (name, range.trim()),
            None => (trimmed, ""),
        };
        if name.is_empty() {
            return Err(ResolveError::parse(raw, "expected a package name"));
        }

        let normalized = self
            .normalizer
            .normalize(range)
            .map_err(|e| ResolveError::parse(raw, e.to_string()))?;

        let mut groups = Vec::new();
        for branch in normalized.split("||") {
            let terms = branch
                .split_whitespace()
                .map(|token| match token {
                    "*" => Ok(RangeTerm::any()),
                    _ => parse_term(raw, token),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if terms.is_empty() {
                return Err(ResolveError::parse(raw, "empty range branch"));
            }
            groups.push(ConstraintGroup::from_terms(terms));
        }

        Ok(ConstraintModel::new(name, groups))
    }

    fn compose(&self, models: &[ConstraintModel]) -> BTreeMap<String, String> {
        merge_by_name(models)
            .into_iter()
            .map(|model| {
                let range = model
                    .groups
                    .iter()
                    .map(|group| {
                        group
                            .terms()
                            .iter()
                            .map(RangeTerm::to_string)
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect::<Vec<_>>()
                    .join(" || ");
                (model.name, range)
            })
            .collect()
    }

    /// Per-operator tightening; alternatives joined by `||` are flattened
    fn restrict(&self, models: &[ConstraintModel]) -> Vec<ConstraintModel> {
        tighten_bounds(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operator;

    fn rendered(group: &ConstraintGroup) -> Vec<String> {
        group.terms().iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_or_of_ands() {
        let model = RangeListParser::npm()
            .parse_spec("foo >=1.0.0 <2.0.0 || >=3.0.0")
            .unwrap();
        assert_eq!(model.name, "foo");
        assert_eq!(model.groups.len(), 2);
        assert_eq!(rendered(&model.groups[0]), vec![">=1.0.0", "<2.0.0"]);
        assert_eq!(
            model.groups[1],
            ConstraintGroup::Single(RangeTerm::new(Operator::GreaterOrEqual, "3.0.0"))
        );

        assert!(model.satisfies("1.5.0"));
        assert!(!model.satisfies("2.5.0"));
        assert!(model.satisfies("3.1.0"));
    }

    #[test]
    fn test_parse_native_npm_syntax() {
        let model = RangeListParser::npm().parse_spec("lodash ^4.17.0").unwrap();
        assert_eq!(rendered(&model.groups[0]), vec![">=4.17.0", "<5.0.0"]);

        let model = RangeListParser::npm().parse_spec("@types/node ~18.11").unwrap();
        assert_eq!(model.name, "@types/node");
        assert_eq!(rendered(&model.groups[0]), vec![">=18.11.0", "<18.12.0"]);
    }

    #[test]
    fn test_parse_name_only_means_any() {
        let model = RangeListParser::npm().parse_spec("express").unwrap();
        assert_eq!(model, ConstraintModel::any_version("express"));

        let model = RangeListParser::npm().parse_spec("express *").unwrap();
        assert_eq!(model, ConstraintModel::any_version("express"));
    }

    #[test]
    fn test_parse_composer() {
        let model = RangeListParser::composer()
            .parse_spec("monolog/monolog ^2.0|^3.0")
            .unwrap();
        assert_eq!(model.name, "monolog/monolog");
        assert_eq!(model.groups.len(), 2);
        assert!(model.satisfies("2.9.1"));
        assert!(model.satisfies("3.5.0"));
        assert!(!model.satisfies("1.27.0"));
    }

    #[test]
    fn test_parse_errors() {
        let err = RangeListParser::npm()
            .parse_spec("foo ^banana")
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
        assert!(err.to_string().contains("^banana"));

        assert!(RangeListParser::npm().parse_spec("").is_err());
        assert!(RangeListParser::composer()
            .parse_spec("foo dev-master")
            .is_err());
    }

    #[test]
    fn test_component_overflow_is_a_parse_error() {
        let err = RangeListParser::npm()
            .parse_spec("foo ^18446744073709551615")
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
        assert!(err.to_string().contains("too large to bump"));

        assert!(RangeListParser::composer()
            .parse_spec("vendor/pkg ^18446744073709551615.0")
            .is_err());
    }

    #[test]
    fn test_compose() {
        let parser = RangeListParser::npm();
        let models = parser
            .parse(&[
                "foo >=1.0.0 <2.0.0 || >=3.0.0".to_string(),
                "bar 1.2.3".to_string(),
            ])
            .unwrap();

        let composed = parser.compose(&models);
        assert_eq!(composed["foo"], ">=1.0.0 <2.0.0 || >=3.0.0");
        assert_eq!(composed["bar"], "=1.2.3");
    }

    #[test]
    fn test_restrict_tightens_bounds() {
        let parser = RangeListParser::npm();
        let models = parser
            .parse(&[
                "foo >=1.0.0".to_string(),
                "foo >=1.2.0 <2.0.0".to_string(),
                "foo <1.8.0".to_string(),
            ])
            .unwrap();

        let restricted = parser.restrict(&models);
        assert_eq!(restricted.len(), 1);
        assert_eq!(parser.compose(&restricted)["foo"], ">=1.2.0 <1.8.0");
    }

    #[test]
    fn test_restrict_flattens_alternatives() {
        let parser = RangeListParser::npm();
        let models = parser
            .parse(&["foo <1.0.0 || >=2.0.0".to_string()])
            .unwrap();

        let restricted = parser.restrict(&models);
        assert_eq!(restricted[0].groups.len(), 1);
        assert_eq!(parser.compose(&restricted)["foo"], ">=2.0.0 <1.0.0");
    }

    #[test]
    fn test_restrict_composer_keeps_exclusions() {
        let parser = RangeListParser::composer();
        let models = parser
            .parse(&[
                "vendor/pkg >=1.0,!=1.5".to_string(),
                "vendor/pkg >=1.2,!=1.7".to_string(),
            ])
            .unwrap();

        let composed = parser.compose(&parser.restrict(&models));
        assert_eq!(composed["vendor/pkg"], ">=1.2.0 !=1.5.0 !=1.7.0");
    }
}
