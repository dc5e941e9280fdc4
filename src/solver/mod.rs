//! Constraint solver
//!
//! Resolves parsed constraints against the releases a `ReleaseFetcher` knows:
//! parse → fetch → duplicate check → filter → sort → store.
//!
//! The solver holds no state between calls; every `solve` builds its own
//! `Resolution`, so one solver can serve concurrent callers.

mod backend;

pub use backend::{Backend, EcosystemRegistry};

use crate::domain::{
    sort_versions, ConstraintModel, Ecosystem, Resolution, ResolvedEntry, SkippedPackage,
};
use crate::error::ResolveError;
use crate::parser::{get_parser, ConstraintParser};
use crate::registry::ReleaseFetcher;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Options for one solve call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Skip packages without releases instead of failing
    pub graceful: bool,
    /// Report every satisfying release instead of only the highest
    pub all_versions: bool,
}

impl SolveOptions {
    pub fn new(graceful: bool, all_versions: bool) -> Self {
        Self {
            graceful,
            all_versions,
        }
    }
}

/// Resolves dependency specifiers to concrete releases
pub struct ConstraintSolver {
    parser: Box<dyn ConstraintParser>,
}

impl ConstraintSolver {
    /// Create a solver around an ecosystem parser
    pub fn new(parser: Box<dyn ConstraintParser>) -> Self {
        Self { parser }
    }

    /// Create a solver with the default parser of an ecosystem
    pub fn for_ecosystem(ecosystem: Ecosystem) -> Self {
        Self::new(get_parser(ecosystem))
    }

    /// Returns the parser used by this solver
    pub fn parser(&self) -> &dyn ConstraintParser {
        self.parser.as_ref()
    }

    /// Parse and resolve a list of specifiers
    pub fn solve(
        &self,
        raw_specs: &[String],
        fetcher: &dyn ReleaseFetcher,
        options: SolveOptions,
    ) -> Result<Resolution, ResolveError> {
        let models = self.parser.parse(raw_specs)?;
        self.solve_models(&models, fetcher, options)
    }

    /// Resolve already-parsed constraint models
    pub fn solve_models(
        &self,
        models: &[ConstraintModel],
        fetcher: &dyn ReleaseFetcher,
        options: SolveOptions,
    ) -> Result<Resolution, ResolveError> {
        let mut resolution = Resolution::new();
        let mut seen: HashSet<String> = HashSet::new();

        for model in models {
            let set = match fetcher.fetch(&model.name) {
                Ok(set) => set,
                Err(e) => {
                    let reason = e.to_string();
                    skip_or_fail(
                        &mut resolution,
                        ResolveError::unresolved(&model.name, Some(e)),
                        &model.name,
                        reason,
                        options,
                    )?;
                    continue;
                }
            };

            if !seen.insert(set.name.clone()) {
                return Err(ResolveError::duplicate(set.name));
            }

            if set.releases.is_empty() {
                skip_or_fail(
                    &mut resolution,
                    ResolveError::unresolved(&model.name, None),
                    &model.name,
                    "registry lists no releases".to_string(),
                    options,
                )?;
                continue;
            }

            let mut matching: Vec<String> = set
                .releases
                .into_iter()
                .filter(|release| model.satisfies(release))
                .collect();
            sort_versions(&mut matching);

            debug!(
                package = %set.name,
                matching = matching.len(),
                "resolved constraint"
            );
            resolution.entries.insert(
                set.name,
                ResolvedEntry::from_sorted(matching, options.all_versions),
            );
        }

        Ok(resolution)
    }
}

/// Record a skipped package in graceful mode, otherwise fail the call
fn skip_or_fail(
    resolution: &mut Resolution,
    error: ResolveError,
    name: &str,
    reason: String,
    options: SolveOptions,
) -> Result<(), ResolveError> {
    if !options.graceful {
        return Err(error);
    }
    warn!(package = name, %reason, "skipping package");
    resolution.skipped.push(SkippedPackage::new(name, reason));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ReleaseIndex;

    fn specs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn foo_index() -> ReleaseIndex {
        ReleaseIndex::new("test").with_releases("foo", ["0.9.0", "1.0.0", "1.5.0", "2.0.0"])
    }

    #[test]
    fn test_solve_latest() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let resolution = solver
            .solve(
                &specs(&["foo >=1.0.0,<2.0.0"]),
                &foo_index(),
                SolveOptions::default(),
            )
            .unwrap();
        assert_eq!(
            resolution.get("foo"),
            Some(&ResolvedEntry::Latest("1.5.0".to_string()))
        );
    }

    #[test]
    fn test_solve_all_versions() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let resolution = solver
            .solve(
                &specs(&["foo >=1.0.0,<2.0.0"]),
                &foo_index(),
                SolveOptions::new(false, true),
            )
            .unwrap();
        assert_eq!(resolution.get("foo").unwrap().versions(), vec!["1.0.0", "1.5.0"]);
    }

    #[test]
    fn test_solve_sorts_by_version_not_string() {
        let index =
            ReleaseIndex::new("test").with_releases("foo", ["1.10.0", "1.9.0", "1.2.0"]);
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let resolution = solver
            .solve(&specs(&["foo"]), &index, SolveOptions::new(false, true))
            .unwrap();
        assert_eq!(
            resolution.get("foo").unwrap().versions(),
            vec!["1.2.0", "1.9.0", "1.10.0"]
        );
    }

    #[test]
    fn test_solve_unmatched_is_null() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let resolution = solver
            .solve(&specs(&["foo >=3.0"]), &foo_index(), SolveOptions::default())
            .unwrap();
        assert_eq!(resolution.get("foo"), Some(&ResolvedEntry::Unmatched));
        assert_eq!(resolution.matched_count(), 0);
    }

    #[test]
    fn test_duplicate_is_fatal_even_when_graceful() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        for graceful in [false, true] {
            let err = solver
                .solve(
                    &specs(&["foo >=1.0", "foo <2.0"]),
                    &foo_index(),
                    SolveOptions::new(graceful, false),
                )
                .unwrap_err();
            assert!(matches!(err, ResolveError::DuplicateDependency { .. }));
        }
    }

    #[test]
    fn test_duplicate_detected_by_canonical_name() {
        let index =
            ReleaseIndex::new("PyPI").with_releases("Flask-SQLAlchemy", ["3.0.0", "3.1.1"]);
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let err = solver
            .solve(
                &specs(&["Flask-SQLAlchemy", "flask_sqlalchemy"]),
                &index,
                SolveOptions::default(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("Flask-SQLAlchemy"));
    }

    #[test]
    fn test_empty_releases_graceful_and_strict() {
        let index = ReleaseIndex::new("test")
            .with_releases("foo", ["1.0.0"])
            .with_releases("ghost", Vec::<String>::new());
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let input = specs(&["ghost >=1.0", "foo"]);

        let resolution = solver
            .solve(&input, &index, SolveOptions::new(true, false))
            .unwrap();
        assert!(!resolution.contains("ghost"));
        assert_eq!(resolution.get("foo").unwrap().version(), Some("1.0.0"));
        assert_eq!(resolution.skipped.len(), 1);
        assert_eq!(resolution.skipped[0].name, "ghost");

        let err = solver
            .solve(&input, &index, SolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedPackage { .. }));
    }

    #[test]
    fn test_fetch_failure_graceful_and_strict() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let input = specs(&["foo", "nowhere >=1.0"]);

        let resolution = solver
            .solve(&input, &foo_index(), SolveOptions::new(true, false))
            .unwrap();
        assert_eq!(resolution.len(), 1);
        assert!(resolution.skipped[0].reason.contains("not found"));

        let err = solver
            .solve(&input, &foo_index(), SolveOptions::default())
            .unwrap_err();
        match err {
            ResolveError::UnresolvedPackage { package, source } => {
                assert_eq!(package, "nowhere");
                assert!(source.is_some_and(|e| e.is_not_found()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_error_aborts_before_fetching() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::PyPI);
        let err = solver
            .solve(
                &specs(&["foo >=1.0", "bar =>2"]),
                &foo_index(),
                SolveOptions::new(true, false),
            )
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
    }

    #[test]
    fn test_no_range_exact_pin() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::Maven);
        let hit = ReleaseIndex::new("test").with_releases("bar", ["3.2.1"]);
        let resolution = solver
            .solve(&specs(&["bar 3.2.1"]), &hit, SolveOptions::default())
            .unwrap();
        assert_eq!(resolution.get("bar").unwrap().version(), Some("3.2.1"));

        let miss = ReleaseIndex::new("test").with_releases("bar", ["3.2.0"]);
        let resolution = solver
            .solve(&specs(&["bar 3.2.1"]), &miss, SolveOptions::default())
            .unwrap();
        assert_eq!(resolution.get("bar").unwrap().version(), None);
    }

    #[test]
    fn test_empty_input() {
        let solver = ConstraintSolver::for_ecosystem(Ecosystem::Npm);
        let resolution = solver
            .solve(&[], &foo_index(), SolveOptions::default())
            .unwrap();
        assert!(resolution.is_empty());
    }
}
