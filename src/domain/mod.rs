//! Core domain models for depsolve
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem types and their grammar families
//! - Version ordering shared by every ecosystem
//! - Constraint models (OR of AND groups of range terms)
//! - Resolution results

mod constraint;
mod ecosystem;
mod resolution;
mod version;

pub use constraint::{ConstraintGroup, ConstraintModel, Operator, RangeTerm, ANY_VERSION};
pub use ecosystem::{Ecosystem, Grammar};
pub use resolution::{Resolution, ResolvedEntry, SkippedPackage};
pub use version::{compare_versions, max_version, min_version, sort_versions};
