//! Desugaring of shorthand range operators into plain bounds
//!
//! Caret, tilde, wildcard and "compatible release" operators all expand to a
//! lower bound plus an optional exclusive upper bound. The helpers here are
//! shared by the range-grammar dialects and the range normalizers.
//!
//! Upper bounds bump a numeric component; a component already at `u64::MAX`
//! has no successor and yields [`ComponentOverflow`].

use crate::domain::{Operator, RangeTerm, ANY_VERSION};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Partial version with optional wildcards: 1, 1.2, 1.x, 1.2.*, 1.2.3-beta.1+build
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV]?(\d+|[xX*])(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:-([0-9A-Za-z.\-]+))?(?:\+[0-9A-Za-z.\-]+)?$",
    )
    .unwrap()
});

/// A version component that cannot be incremented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("version component {0} is too large to bump")]
pub(crate) struct ComponentOverflow(pub u64);

fn bump(component: u64) -> Result<u64, ComponentOverflow> {
    component.checked_add(1).ok_or(ComponentOverflow(component))
}

/// A version with possibly missing minor/patch components
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartialVersion {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub pre: Option<String>,
}

impl PartialVersion {
    /// Parse a partial version; wildcards become missing components
    pub fn parse(input: &str) -> Option<Self> {
        let caps = PARTIAL_RE.captures(input.trim())?;
        let component = |index: usize| -> Option<u64> {
            caps.get(index).and_then(|m| m.as_str().parse().ok())
        };

        let major = component(1);
        // Anything after a wildcard is a wildcard too
        let minor = major.and(component(2));
        let patch = minor.and(component(3));
        let pre = patch.and(caps.get(4).map(|m| m.as_str().to_string()));

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Returns true when major, minor and patch are all present
    pub fn is_complete(&self) -> bool {
        self.patch.is_some()
    }

    /// Render with missing components filled by zero
    pub fn floor(&self) -> String {
        let mut rendered = format!(
            "{}.{}.{}",
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0)
        );
        if let Some(ref pre) = self.pre {
            rendered.push('-');
            rendered.push_str(pre);
        }
        rendered
    }

    /// The first version past every version this partial covers, if bounded
    pub fn ceiling(&self) -> Result<Option<String>, ComponentOverflow> {
        let ceiling = match (self.major, self.minor, self.patch) {
            (None, _, _) => return Ok(None),
            (Some(major), None, _) => format!("{}.0.0", bump(major)?),
            (Some(major), Some(minor), None) => format!("{}.{}.0", major, bump(minor)?),
            (Some(major), Some(minor), Some(patch)) => {
                format!("{}.{}.{}", major, minor, bump(patch)?)
            }
        };
        Ok(Some(ceiling))
    }
}

/// Returns true when a release component is `*`, `x` or `X`
pub(crate) fn has_wildcard(version: &str) -> bool {
    version
        .split(['-', '+'])
        .next()
        .unwrap_or_default()
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

/// `X.Y.Z` covering every version the partial matches (`1.2` → `>=1.2.0 <1.3.0`)
pub(crate) fn x_range(version: &PartialVersion) -> Result<Vec<RangeTerm>, ComponentOverflow> {
    if version.is_complete() {
        return Ok(vec![RangeTerm::exact(version.floor())]);
    }
    Ok(bounded(version.floor(), version.ceiling()?))
}

/// Caret range: changes that do not modify the left-most non-zero component
pub(crate) fn caret(version: &PartialVersion) -> Result<Vec<RangeTerm>, ComponentOverflow> {
    let upper = match (version.major, version.minor, version.patch) {
        (None, _, _) => None,
        (Some(major), None, _) => Some(format!("{}.0.0", bump(major)?)),
        (Some(0), Some(minor), None) => Some(format!("0.{}.0", bump(minor)?)),
        (Some(0), Some(0), Some(patch)) => Some(format!("0.0.{}", bump(patch)?)),
        (Some(0), Some(minor), Some(_)) => Some(format!("0.{}.0", bump(minor)?)),
        (Some(major), Some(_), _) => Some(format!("{}.0.0", bump(major)?)),
    };
    Ok(bounded(version.floor(), upper))
}

/// Tilde range: patch-level changes if minor is given, minor-level otherwise
pub(crate) fn tilde(version: &PartialVersion) -> Result<Vec<RangeTerm>, ComponentOverflow> {
    let upper = match (version.major, version.minor) {
        (None, _) => None,
        (Some(major), None) => Some(format!("{}.0.0", bump(major)?)),
        (Some(major), Some(minor)) => Some(format!("{}.{}.0", major, bump(minor)?)),
    };
    Ok(bounded(version.floor(), upper))
}

/// Expand a comparison against a partial version (`>1.2` → `>=1.3.0`)
pub(crate) fn comparison(
    op: Operator,
    version: &PartialVersion,
) -> Result<Vec<RangeTerm>, ComponentOverflow> {
    if version.major.is_none() {
        return Ok(match op {
            Operator::Less | Operator::NotEqual => vec![RangeTerm::new(Operator::Less, ANY_VERSION)],
            _ => vec![RangeTerm::any()],
        });
    }
    if version.is_complete() {
        return Ok(vec![RangeTerm::new(op, version.floor())]);
    }

    // Partial versions cover a whole range; the ceiling is always present here
    let ceiling = || -> Result<String, ComponentOverflow> {
        Ok(version.ceiling()?.unwrap_or_else(|| version.floor()))
    };
    let terms = match op {
        Operator::GreaterOrEqual => vec![RangeTerm::new(Operator::GreaterOrEqual, version.floor())],
        Operator::Greater => vec![RangeTerm::new(Operator::GreaterOrEqual, ceiling()?)],
        Operator::LessOrEqual => vec![RangeTerm::new(Operator::Less, ceiling()?)],
        Operator::Less => vec![RangeTerm::new(Operator::Less, version.floor())],
        Operator::Equal => return x_range(version),
        Operator::NotEqual => vec![RangeTerm::new(Operator::NotEqual, version.floor())],
    };
    Ok(terms)
}

/// Leading numeric release segments (`2.0rc1` → `[2, 0]`, `1.4.5.2` → `[1, 4, 5, 2]`)
pub(crate) fn release_segments(version: &str) -> Vec<u64> {
    let mut segments = Vec::new();
    for part in version.trim_start_matches(['v', 'V']).split('.') {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        let Ok(value) = digits.parse::<u64>() else {
            break;
        };
        segments.push(value);
        if digits.len() != part.len() {
            break;
        }
    }
    segments
}

/// Pessimistic upper bound: drop the last release segment, bump the new last
///
/// `1.4.5` → `1.5`, `1.2` → `2`, `3` → `4`. Used by `~=`, `~>` and Composer `~`.
/// Returns `Ok(None)` when the version has no numeric release segment.
pub(crate) fn pessimistic_upper(version: &str) -> Result<Option<String>, ComponentOverflow> {
    let segments = release_segments(version);
    if segments.is_empty() {
        return Ok(None);
    }
    let keep = segments.len().saturating_sub(1).max(1);
    bump_last(&segments[..keep]).map(Some)
}

/// Join release segments after incrementing the last one (`[1, 4]` → `1.5`)
pub(crate) fn bump_last(segments: &[u64]) -> Result<String, ComponentOverflow> {
    let mut upper = segments.to_vec();
    if let Some(last) = upper.last_mut() {
        *last = bump(*last)?;
    }
    Ok(upper
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

fn bounded(lower: String, upper: Option<String>) -> Vec<RangeTerm> {
    let mut terms = vec![RangeTerm::new(Operator::GreaterOrEqual, lower)];
    if let Some(upper) = upper {
        terms.push(RangeTerm::new(Operator::Less, upper));
    }
    terms
}
