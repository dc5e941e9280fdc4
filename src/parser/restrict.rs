//! Per-operator bound tightening
//!
//! Every term of every group is collected per package and operator, then:
//! - `>` and `>=` keep the highest version
//! - `<` and `<=` keep the lowest version
//! - `=` and `!=` keep each distinct version
//!
//! The surviving terms form a single AND group. OR structure in the input is
//! not preserved: `<1.0 || >=2.0` restricts to `>=2.0 <1.0`.

use crate::domain::{
    compare_versions, max_version, min_version, ConstraintGroup, ConstraintModel, Operator,
    RangeTerm,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Tighten the bounds of each package, one output model per package
pub(crate) fn tighten_bounds(models: &[ConstraintModel]) -> Vec<ConstraintModel> {
    let mut packages: Vec<(&str, BTreeMap<Operator, Vec<&str>>)> = Vec::new();

    for model in models {
        let index = match packages.iter().position(|(name, _)| *name == model.name) {
            Some(index) => index,
            None => {
                packages.push((model.name.as_str(), BTreeMap::new()));
                packages.len() - 1
            }
        };
        let by_operator = &mut packages[index].1;
        for term in model.terms() {
            by_operator
                .entry(term.op)
                .or_default()
                .push(term.version.as_str());
        }
    }

    packages
        .into_iter()
        .map(|(name, by_operator)| {
            let terms: Vec<RangeTerm> = by_operator
                .into_iter()
                .flat_map(|(op, versions)| tighten(op, versions))
                .collect();
            if terms.is_empty() {
                // Nothing to keep: the package stays unsatisfiable
                ConstraintModel::new(name, Vec::new())
            } else {
                ConstraintModel::new(name, vec![ConstraintGroup::from_terms(terms)])
            }
        })
        .collect()
}

fn tighten(op: Operator, mut versions: Vec<&str>) -> Vec<RangeTerm> {
    if op.is_lower_bound() {
        return max_version(versions)
            .map(|v| RangeTerm::new(op, v))
            .into_iter()
            .collect();
    }
    if op.is_upper_bound() {
        return min_version(versions)
            .map(|v| RangeTerm::new(op, v))
            .into_iter()
            .collect();
    }

    versions.sort_by(|a, b| compare_versions(a, b));
    versions.dedup_by(|a, b| compare_versions(a, b) == Ordering::Equal);
    versions
        .into_iter()
        .map(|v| RangeTerm::new(op, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, terms: &[(Operator, &str)]) -> ConstraintModel {
        let terms = terms
            .iter()
            .map(|(op, v)| RangeTerm::new(*op, *v))
            .collect();
        ConstraintModel::new(name, vec![ConstraintGroup::from_terms(terms)])
    }

    fn single(name: &str, op: Operator, version: &str) -> ConstraintModel {
        ConstraintModel::single(name, RangeTerm::new(op, version))
    }

    #[test]
    fn test_tightens_lower_and_upper_bounds() {
        let input = vec![
            single("foo", Operator::GreaterOrEqual, "1.0.0"),
            single("foo", Operator::GreaterOrEqual, "1.2.0"),
            single("foo", Operator::Less, "2.0.0"),
            single("foo", Operator::Less, "1.8.0"),
        ];

        let restricted = tighten_bounds(&input);
        assert_eq!(restricted.len(), 1);
        assert_eq!(
            restricted[0].terms().cloned().collect::<Vec<_>>(),
            vec![
                RangeTerm::new(Operator::GreaterOrEqual, "1.2.0"),
                RangeTerm::new(Operator::Less, "1.8.0"),
            ]
        );
    }

    #[test]
    fn test_uses_version_ordering_not_string_ordering() {
        let input = vec![
            single("foo", Operator::Greater, "1.9.0"),
            single("foo", Operator::Greater, "1.10.0"),
            single("foo", Operator::LessOrEqual, "10.0"),
            single("foo", Operator::LessOrEqual, "9.0"),
        ];
        let restricted = tighten_bounds(&input);
        let rendered: Vec<String> = restricted[0].terms().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec![">1.10.0", "<=9.0"]);
    }

    #[test]
    fn test_is_idempotent() {
        let input = vec![
            model(
                "foo",
                &[(Operator::GreaterOrEqual, "1.0"), (Operator::Less, "3.0")],
            ),
            single("foo", Operator::GreaterOrEqual, "1.5"),
            single("foo", Operator::NotEqual, "1.7"),
            single("foo", Operator::NotEqual, "1.6"),
        ];
        let once = tighten_bounds(&input);
        let twice = tighten_bounds(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_keeps_distinct_exact_and_exclusions() {
        let input = vec![
            single("foo", Operator::NotEqual, "1.6"),
            single("foo", Operator::NotEqual, "1.5.0"),
            single("foo", Operator::NotEqual, "1.5"),
        ];
        let restricted = tighten_bounds(&input);
        let rendered: Vec<String> = restricted[0].terms().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["!=1.5.0", "!=1.6"]);
    }

    #[test]
    fn test_one_model_per_package_in_order() {
        let input = vec![
            single("bar", Operator::Less, "2.0"),
            single("foo", Operator::GreaterOrEqual, "1.0"),
            single("bar", Operator::Less, "1.5"),
        ];
        let restricted = tighten_bounds(&input);
        assert_eq!(restricted.len(), 2);
        assert_eq!(restricted[0].name, "bar");
        assert_eq!(
            restricted[0].groups,
            vec![ConstraintGroup::Single(RangeTerm::new(Operator::Less, "1.5"))]
        );
        assert_eq!(restricted[1].name, "foo");
    }

    #[test]
    fn test_known_narrowing_drops_or_structure() {
        // `<1.0 || >=2.0` accepted 2.5 before restriction; afterwards the
        // branches are ANDed and nothing is accepted
        let input = vec![ConstraintModel::new(
            "foo",
            vec![
                ConstraintGroup::Single(RangeTerm::new(Operator::Less, "1.0")),
                ConstraintGroup::Single(RangeTerm::new(Operator::GreaterOrEqual, "2.0")),
            ],
        )];
        assert!(input[0].satisfies("2.5"));

        let restricted = tighten_bounds(&input);
        assert_eq!(restricted[0].groups.len(), 1);
        assert!(!restricted[0].satisfies("2.5"));
    }

    #[test]
    fn test_empty_model_stays_empty() {
        let input = vec![ConstraintModel::new("foo", Vec::new())];
        let restricted = tighten_bounds(&input);
        assert!(restricted[0].groups.is_empty());
    }
}
