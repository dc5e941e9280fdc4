//! Ecosystem-native range normalizers
//!
//! A normalizer rewrites a manifest range into comparable form: OR-branches
//! joined by ` || `, each branch a run of whitespace-separated
//! `<op><version>` comparators using only `>=`, `>`, `<=`, `<`, `=`, `!=`.
//!
//! - npm: `^`, `~`, X-ranges, hyphen ranges, partial versions
//! - Composer: npm syntax plus `|`, `,`, stability flags and Composer tilde

use crate::domain::{Operator, RangeTerm};
use crate::parser::bounds::{self, ComponentOverflow, PartialVersion};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Operator separated from its version by whitespace: ">= 1.2.3"
static SPACED_OP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|!=|~>|[<>=^~])\s+").unwrap());
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(>=|<=|!=|~>|[<>=^~])?(.+)$").unwrap());
static STABILITY_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z]+").unwrap());
static COMPOSER_OR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|\|?").unwrap());

/// A range token the normalizer cannot interpret
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported range token '{token}'{}", suffix(.reason))]
pub struct UnsupportedRange {
    pub token: String,
    /// Why the token was rejected, when it parsed but has no valid bounds
    pub reason: Option<String>,
}

fn suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|reason| format!(": {}", reason))
        .unwrap_or_default()
}

impl UnsupportedRange {
    fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            reason: None,
        }
    }

    fn overflow(token: impl Into<String>, overflow: ComponentOverflow) -> Self {
        Self {
            token: token.into(),
            reason: Some(overflow.to_string()),
        }
    }
}

/// Rewrites an ecosystem-native range into comparable form
pub trait RangeNormalizer: Send + Sync {
    /// Normalize one range expression
    fn normalize(&self, range: &str) -> Result<String, UnsupportedRange>;
}

/// npm (node-semver) range normalizer
pub struct NpmRangeNormalizer;

/// Composer range normalizer
pub struct ComposerRangeNormalizer;

impl RangeNormalizer for NpmRangeNormalizer {
    fn normalize(&self, range: &str) -> Result<String, UnsupportedRange> {
        let branches = range
            .split("||")
            .map(|branch| normalize_branch(branch, &[' '], npm_token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(branches.join(" || "))
    }
}

impl RangeNormalizer for ComposerRangeNormalizer {
    fn normalize(&self, range: &str) -> Result<String, UnsupportedRange> {
        let range = STABILITY_FLAG_RE.replace_all(range, "");
        let branches = COMPOSER_OR_RE
            .split(&range)
            .map(|branch| normalize_branch(branch, &[' ', ','], composer_token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(branches.join(" || "))
    }
}

/// Normalize one OR-branch into space-joined comparators
fn normalize_branch(
    branch: &str,
    separators: &[char],
    token: fn(Option<&str>, &str) -> Result<Vec<RangeTerm>, UnsupportedRange>,
) -> Result<String, UnsupportedRange> {
    let branch = branch.trim();
    if branch.is_empty() || matches!(branch, "*" | "x" | "X" | "latest") {
        return Ok(RangeTerm::any().to_string());
    }

    if let Some(caps) = HYPHEN_RE.captures(branch) {
        return hyphen(&caps[1], &caps[2]).map(|terms| render(&terms));
    }

    let collapsed = SPACED_OP_RE.replace_all(branch, "$1");
    let mut terms = Vec::new();
    for raw in collapsed.split(separators).filter(|t| !t.is_empty()) {
        let caps = TOKEN_RE
            .captures(raw)
            .ok_or_else(|| UnsupportedRange::new(raw))?;
        let op = caps.get(1).map(|m| m.as_str());
        terms.extend(token(op, &caps[2])?);
    }

    if terms.is_empty() {
        return Ok(RangeTerm::any().to_string());
    }
    Ok(render(&terms))
}

/// `1.2.3 - 2.3` → `>=1.2.3 <2.4.0`
fn hyphen(from: &str, to: &str) -> Result<Vec<RangeTerm>, UnsupportedRange> {
    let lower = PartialVersion::parse(from).ok_or_else(|| UnsupportedRange::new(from))?;
    let upper = PartialVersion::parse(to).ok_or_else(|| UnsupportedRange::new(to))?;

    let mut terms = vec![RangeTerm::new(Operator::GreaterOrEqual, lower.floor())];
    if upper.is_complete() {
        terms.push(RangeTerm::new(Operator::LessOrEqual, upper.floor()));
    } else if let Some(ceiling) = upper
        .ceiling()
        .map_err(|e| UnsupportedRange::overflow(to, e))?
    {
        terms.push(RangeTerm::new(Operator::Less, ceiling));
    }
    Ok(terms)
}

fn npm_token(op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, UnsupportedRange> {
    let token = format!("{}{}", op.unwrap_or(""), version);
    let partial =
        PartialVersion::parse(version).ok_or_else(|| UnsupportedRange::new(token.as_str()))?;

    let terms = match op {
        Some("^") => bounds::caret(&partial),
        Some("~") | Some("~>") => bounds::tilde(&partial),
        None | Some("=") => bounds::x_range(&partial),
        // node-semver has no inequality operator
        Some("!=") => return Err(UnsupportedRange::new(token)),
        Some(symbol) => match Operator::from_symbol(symbol) {
            Some(op) => bounds::comparison(op, &partial),
            None => return Err(UnsupportedRange::new(token)),
        },
    };
    terms.map_err(|e| UnsupportedRange::overflow(token, e))
}

fn composer_token(op: Option<&str>, version: &str) -> Result<Vec<RangeTerm>, UnsupportedRange> {
    let token = format!("{}{}", op.unwrap_or(""), version);
    let partial =
        PartialVersion::parse(version).ok_or_else(|| UnsupportedRange::new(token.as_str()))?;
    let has_wildcard = bounds::has_wildcard(version);

    let terms = match op {
        Some("^") => bounds::caret(&partial),
        // Composer tilde allows the last given component to move
        Some("~") | Some("~>") => bounds::pessimistic_upper(version).map(|upper| {
            let mut terms = vec![RangeTerm::new(Operator::GreaterOrEqual, partial.floor())];
            terms.extend(upper.map(|upper| RangeTerm::new(Operator::Less, upper)));
            terms
        }),
        None | Some("=") if has_wildcard || partial.major.is_none() => bounds::x_range(&partial),
        None | Some("=") => Ok(vec![RangeTerm::exact(partial.floor())]),
        Some(symbol) => {
            let op = Operator::from_symbol(symbol)
                .ok_or_else(|| UnsupportedRange::new(token.as_str()))?;
            if has_wildcard || partial.major.is_none() {
                bounds::comparison(op, &partial)
            } else {
                Ok(vec![RangeTerm::new(op, partial.floor())])
            }
        }
    };
    terms.map_err(|e| UnsupportedRange::overflow(token, e))
}

fn render(terms: &[RangeTerm]) -> String {
    terms
        .iter()
        .map(RangeTerm::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npm(range: &str) -> String {
        NpmRangeNormalizer.normalize(range).unwrap()
    }

    fn composer(range: &str) -> String {
        ComposerRangeNormalizer.normalize(range).unwrap()
    }

    #[test]
    fn test_npm_caret_and_tilde() {
        assert_eq!(npm("^1.2.3"), ">=1.2.3 <2.0.0");
        assert_eq!(npm("^0.2.3"), ">=0.2.3 <0.3.0");
        assert_eq!(npm("~1.2.3"), ">=1.2.3 <1.3.0");
    }

    #[test]
    fn test_npm_exact_and_partial() {
        assert_eq!(npm("1.2.3"), "=1.2.3");
        assert_eq!(npm("=1.2.3"), "=1.2.3");
        assert_eq!(npm("1.2"), ">=1.2.0 <1.3.0");
        assert_eq!(npm("1.x"), ">=1.0.0 <2.0.0");
        assert_eq!(npm("v2.0.0"), "=2.0.0");
    }

    #[test]
    fn test_npm_any() {
        assert_eq!(npm("*"), ">=0.0.0");
        assert_eq!(npm(""), ">=0.0.0");
        assert_eq!(npm("x"), ">=0.0.0");
        assert_eq!(npm("latest"), ">=0.0.0");
    }

    #[test]
    fn test_npm_comparators_pass_through() {
        assert_eq!(npm(">=1.0.0 <2.0.0"), ">=1.0.0 <2.0.0");
        assert_eq!(npm(">= 1.0.0 < 2.0.0"), ">=1.0.0 <2.0.0");
        assert_eq!(npm(">1.2"), ">=1.3.0");
    }

    #[test]
    fn test_npm_or_branches() {
        assert_eq!(
            npm(">=1.0.0 <2.0.0 || ^3.0.0"),
            ">=1.0.0 <2.0.0 || >=3.0.0 <4.0.0"
        );
        assert_eq!(npm("1.x || >=2.5.0 || 5.0.0 - 7.2.3"), ">=1.0.0 <2.0.0 || >=2.5.0 || >=5.0.0 <=7.2.3");
    }

    #[test]
    fn test_npm_hyphen_with_partial_upper() {
        assert_eq!(npm("1.2.3 - 2.3"), ">=1.2.3 <2.4.0");
        assert_eq!(npm("1.2 - 2"), ">=1.2.0 <3.0.0");
    }

    #[test]
    fn test_npm_rejects_garbage() {
        let err = NpmRangeNormalizer.normalize("^banana").unwrap_err();
        assert_eq!(err.token, "^banana");
        assert!(NpmRangeNormalizer.normalize(">=1.0.0 <two").is_err());
        assert!(NpmRangeNormalizer.normalize("!=1.0.0").is_err());
    }

    #[test]
    fn test_composer_operators() {
        assert_eq!(composer("^1.2"), ">=1.2.0 <2.0.0");
        assert_eq!(composer("~1.2"), ">=1.2.0 <2");
        assert_eq!(composer("~1.2.3"), ">=1.2.3 <1.3");
        assert_eq!(composer("1.0.*"), ">=1.0.0 <1.1.0");
        assert_eq!(composer("1.0.2"), "=1.0.2");
        assert_eq!(composer("1.0"), "=1.0.0");
    }

    #[test]
    fn test_composer_and_or_separators() {
        assert_eq!(composer(">=1.0,<2.0"), ">=1.0.0 <2.0.0");
        assert_eq!(composer(">=1.0 <1.1 || >=1.2"), ">=1.0.0 <1.1.0 || >=1.2.0");
        assert_eq!(composer("^1.0|^2.0"), ">=1.0.0 <2.0.0 || >=2.0.0 <3.0.0");
    }

    #[test]
    fn test_composer_strict_comparisons_keep_version() {
        // Composer treats partial versions in comparisons literally
        assert_eq!(composer(">1.0"), ">1.0.0");
        assert_eq!(composer("!=1.5"), "!=1.5.0");
    }

    #[test]
    fn test_composer_stability_flags() {
        assert_eq!(composer("^1.0@dev"), ">=1.0.0 <2.0.0");
        assert_eq!(composer("*@stable"), ">=0.0.0");
    }

    #[test]
    fn test_component_overflow_is_rejected() {
        let err = NpmRangeNormalizer
            .normalize("^18446744073709551615")
            .unwrap_err();
        assert_eq!(err.token, "^18446744073709551615");
        assert!(err.to_string().contains("too large to bump"));

        assert!(NpmRangeNormalizer.normalize("~1.18446744073709551615").is_err());
        assert!(NpmRangeNormalizer.normalize("1.0.0 - 18446744073709551615").is_err());
        assert!(ComposerRangeNormalizer.normalize("~1.18446744073709551615.0").is_err());
        assert_eq!(
            npm(">=18446744073709551615.0.0"),
            ">=18446744073709551615.0.0"
        );
    }

    #[test]
    fn test_composer_rejects_branches() {
        let err = ComposerRangeNormalizer.normalize("dev-master").unwrap_err();
        assert_eq!(err.token, "dev-master");
    }
}
