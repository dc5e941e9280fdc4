//! In-memory constraint model
//!
//! A package constraint is an OR of groups, and each group is an AND of
//! `(operator, version)` terms:
//! - `>=1.0.0 <2.0.0 || >=3.0.0` has two groups
//! - the first group holds two terms, the second holds one
//!
//! Membership is decided with [`compare_versions`].

use crate::domain::version::compare_versions;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Lowest possible version, used for "any version" constraints
pub const ANY_VERSION: &str = "0.0.0";

/// Comparison operator of a range term
///
/// `=` and `==` are the same operator; both parse to [`Operator::Equal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `>=`
    GreaterOrEqual,
    /// `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `<`
    Less,
    /// `=` or `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl Operator {
    /// Parse an operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(Operator::GreaterOrEqual),
            ">" => Some(Operator::Greater),
            "<=" => Some(Operator::LessOrEqual),
            "<" => Some(Operator::Less),
            "=" | "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            _ => None,
        }
    }

    /// Returns the canonical symbol for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::GreaterOrEqual => ">=",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::Less => "<",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
        }
    }

    /// Check whether `compare(candidate, bound)` satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::Less => ordering == Ordering::Less,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
        }
    }

    /// Returns true for `>` and `>=`
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Operator::GreaterOrEqual | Operator::Greater)
    }

    /// Returns true for `<` and `<=`
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Operator::LessOrEqual | Operator::Less)
    }

    /// Returns all operators in canonical order
    pub fn all() -> &'static [Operator] {
        &[
            Operator::GreaterOrEqual,
            Operator::Greater,
            Operator::LessOrEqual,
            Operator::Less,
            Operator::Equal,
            Operator::NotEqual,
        ]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single `(operator, version)` condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeTerm {
    pub op: Operator,
    pub version: String,
}

impl RangeTerm {
    /// Creates a new RangeTerm
    pub fn new(op: Operator, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }

    /// Creates an exact-match term; this is the default when no operator is written
    pub fn exact(version: impl Into<String>) -> Self {
        Self::new(Operator::Equal, version)
    }

    /// Creates the "any version" term `>=0.0.0`
    pub fn any() -> Self {
        Self::new(Operator::GreaterOrEqual, ANY_VERSION)
    }

    /// Check whether a candidate version satisfies this term
    pub fn satisfied_by(&self, candidate: &str) -> bool {
        self.op.accepts(compare_versions(candidate, &self.version))
    }
}

impl fmt::Display for RangeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// One OR-branch of a constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintGroup {
    /// A branch with a single condition
    Single(RangeTerm),
    /// A branch whose conditions must all hold
    All(Vec<RangeTerm>),
}

impl ConstraintGroup {
    /// Build a group from terms, collapsing a lone term into [`ConstraintGroup::Single`]
    pub fn from_terms(mut terms: Vec<RangeTerm>) -> Self {
        if terms.len() == 1 {
            ConstraintGroup::Single(terms.remove(0))
        } else {
            ConstraintGroup::All(terms)
        }
    }

    /// The terms of this group
    pub fn terms(&self) -> &[RangeTerm] {
        match self {
            ConstraintGroup::Single(term) => std::slice::from_ref(term),
            ConstraintGroup::All(terms) => terms,
        }
    }

    /// Check whether every term of this group accepts the candidate
    pub fn satisfied_by(&self, candidate: &str) -> bool {
        match self {
            ConstraintGroup::Single(term) => term.satisfied_by(candidate),
            ConstraintGroup::All(terms) => terms.iter().all(|term| term.satisfied_by(candidate)),
        }
    }
}

/// Version constraint of one package
///
/// Satisfied when at least one group is satisfied. A model without groups
/// accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintModel {
    /// Package name as written in the specifier
    pub name: String,
    /// OR-branches, in declaration order
    pub groups: Vec<ConstraintGroup>,
}

impl ConstraintModel {
    /// Creates a new ConstraintModel
    pub fn new(name: impl Into<String>, groups: Vec<ConstraintGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    /// Creates a model with a single one-term group
    pub fn single(name: impl Into<String>, term: RangeTerm) -> Self {
        Self::new(name, vec![ConstraintGroup::Single(term)])
    }

    /// Creates a model accepting any version
    pub fn any_version(name: impl Into<String>) -> Self {
        Self::single(name, RangeTerm::any())
    }

    /// Check whether a candidate version satisfies this constraint
    pub fn satisfies(&self, candidate: &str) -> bool {
        self.groups.iter().any(|group| group.satisfied_by(candidate))
    }

    /// Iterate over every term of every group
    pub fn terms(&self) -> impl Iterator<Item = &RangeTerm> {
        self.groups.iter().flat_map(|group| group.terms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(op: Operator, version: &str) -> RangeTerm {
        RangeTerm::new(op, version)
    }

    #[test]
    fn test_operator_from_symbol() {
        assert_eq!(Operator::from_symbol(">="), Some(Operator::GreaterOrEqual));
        assert_eq!(Operator::from_symbol(">"), Some(Operator::Greater));
        assert_eq!(Operator::from_symbol("<="), Some(Operator::LessOrEqual));
        assert_eq!(Operator::from_symbol("<"), Some(Operator::Less));
        assert_eq!(Operator::from_symbol("="), Some(Operator::Equal));
        assert_eq!(Operator::from_symbol("=="), Some(Operator::Equal));
        assert_eq!(Operator::from_symbol("!="), Some(Operator::NotEqual));
        assert_eq!(Operator::from_symbol("=>"), None);
        assert_eq!(Operator::from_symbol("~"), None);
    }

    #[test]
    fn test_operator_symbol_roundtrip() {
        for op in Operator::all() {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(*op));
        }
    }

    #[test]
    fn test_operator_accepts() {
        use Ordering::*;
        assert!(Operator::GreaterOrEqual.accepts(Equal));
        assert!(Operator::GreaterOrEqual.accepts(Greater));
        assert!(!Operator::GreaterOrEqual.accepts(Less));
        assert!(Operator::Greater.accepts(Greater));
        assert!(!Operator::Greater.accepts(Equal));
        assert!(Operator::LessOrEqual.accepts(Less));
        assert!(Operator::LessOrEqual.accepts(Equal));
        assert!(!Operator::LessOrEqual.accepts(Greater));
        assert!(Operator::Less.accepts(Less));
        assert!(!Operator::Less.accepts(Equal));
        assert!(Operator::Equal.accepts(Equal));
        assert!(!Operator::Equal.accepts(Less));
        assert!(Operator::NotEqual.accepts(Greater));
        assert!(!Operator::NotEqual.accepts(Equal));
    }

    #[test]
    fn test_bound_kinds() {
        assert!(Operator::Greater.is_lower_bound());
        assert!(Operator::GreaterOrEqual.is_lower_bound());
        assert!(Operator::Less.is_upper_bound());
        assert!(Operator::LessOrEqual.is_upper_bound());
        assert!(!Operator::Equal.is_lower_bound());
        assert!(!Operator::NotEqual.is_upper_bound());
    }

    #[test]
    fn test_exact_term_matches_only_itself() {
        let model = ConstraintModel::single("foo", RangeTerm::exact("1.2.0"));
        assert!(model.satisfies("1.2.0"));
        assert!(model.satisfies("1.2"));
        assert!(!model.satisfies("1.2.1"));
        assert!(!model.satisfies("1.1.9"));
        assert!(!model.satisfies("1.2.0-rc1"));
    }

    #[test]
    fn test_or_of_and_semantics() {
        let model = ConstraintModel::new(
            "foo",
            vec![
                ConstraintGroup::Single(term(Operator::GreaterOrEqual, "2.0.0")),
                ConstraintGroup::All(vec![
                    term(Operator::GreaterOrEqual, "1.0.0"),
                    term(Operator::Less, "1.5.0"),
                ]),
            ],
        );

        assert!(model.satisfies("1.2.0"));
        assert!(model.satisfies("2.1.0"));
        assert!(!model.satisfies("1.6.0"));
        assert!(!model.satisfies("0.9.0"));
    }

    #[test]
    fn test_empty_model_accepts_nothing() {
        let model = ConstraintModel::new("foo", Vec::new());
        assert!(!model.satisfies("1.0.0"));
        assert!(!model.satisfies("0.0.0"));
    }

    #[test]
    fn test_any_version() {
        let model = ConstraintModel::any_version("foo");
        assert!(model.satisfies("0.0.0"));
        assert!(model.satisfies("99.1"));
    }

    #[test]
    fn test_not_equal_term() {
        let model = ConstraintModel::new(
            "foo",
            vec![ConstraintGroup::All(vec![
                term(Operator::GreaterOrEqual, "1.0"),
                term(Operator::NotEqual, "1.3.0"),
            ])],
        );
        assert!(model.satisfies("1.2.0"));
        assert!(!model.satisfies("1.3"));
        assert!(model.satisfies("1.4.0"));
    }

    #[test]
    fn test_group_from_terms() {
        let single = ConstraintGroup::from_terms(vec![term(Operator::Less, "2.0")]);
        assert!(matches!(single, ConstraintGroup::Single(_)));

        let all = ConstraintGroup::from_terms(vec![
            term(Operator::GreaterOrEqual, "1.0"),
            term(Operator::Less, "2.0"),
        ]);
        assert!(matches!(all, ConstraintGroup::All(ref terms) if terms.len() == 2));
    }

    #[test]
    fn test_model_terms_flattens_groups() {
        let model = ConstraintModel::new(
            "foo",
            vec![
                ConstraintGroup::Single(term(Operator::GreaterOrEqual, "2.0.0")),
                ConstraintGroup::All(vec![
                    term(Operator::GreaterOrEqual, "1.0.0"),
                    term(Operator::Less, "1.5.0"),
                ]),
            ],
        );
        let rendered: Vec<String> = model.terms().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec![">=2.0.0", ">=1.0.0", "<1.5.0"]);
    }

    #[test]
    fn test_serde_constraint_group() {
        let group = ConstraintGroup::Single(RangeTerm::exact("1.0.0"));
        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(json, r#"{"single":{"op":"equal","version":"1.0.0"}}"#);

        let parsed: ConstraintGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, group);
    }
}
