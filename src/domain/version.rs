//! Version ordering shared by every ecosystem
//!
//! Versions are opaque strings. They are compared on demand by splitting on
//! `.` and `-` and ranking every segment:
//! - numeric segments compare by integer value, whatever their size
//! - anything else ranks as `-1`, so `1.0.0-rc1` sorts before `1.0.0`
//! - the shorter sequence is right-padded with zeros (`1.0 == 1.0.0`)
//!
//! This is intentionally not semver precedence: `rc1` and `rc2` compare equal.

use std::cmp::Ordering;

/// One comparable segment of a version
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// Not a plain integer; ranks below every number
    NonNumeric,
    /// Decimal digits with leading zeros stripped (zero is empty)
    Number(&'a str),
}

/// Padding for the shorter version
const ZERO: Segment<'static> = Segment::Number("");

impl<'a> Segment<'a> {
    fn parse(segment: &'a str) -> Self {
        let digits = segment.strip_prefix('+').unwrap_or(segment);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Segment::NonNumeric;
        }
        Segment::Number(digits.trim_start_matches('0'))
    }
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::NonNumeric, Segment::NonNumeric) => Ordering::Equal,
            (Segment::NonNumeric, Segment::Number(_)) => Ordering::Less,
            (Segment::Number(_), Segment::NonNumeric) => Ordering::Greater,
            // Without leading zeros, more digits means a larger number
            (Segment::Number(a), Segment::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a version into its comparable segments
fn segments(version: &str) -> Vec<Segment<'_>> {
    version.split(['.', '-']).map(Segment::parse).collect()
}

/// Compare two version strings
///
/// The ordering is total: it is antisymmetric and transitive for any input,
/// including strings that do not look like versions at all.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = segments(a);
    let mut right = segments(b);

    let width = left.len().max(right.len());
    left.resize(width, ZERO);
    right.resize(width, ZERO);

    left.cmp(&right)
}

/// Sort versions in ascending order
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Return the highest of the given versions
pub fn max_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}

/// Return the lowest of the given versions
pub fn min_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .min_by(|a, b| compare_versions(a, b))
}
