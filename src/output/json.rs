//! JSON output formatter for machine processing
//!
//! Resolutions serialize as `{ "name": "1.2.3" | ["1.0.0", ...] | null }`,
//! the same shape callers of the library get from `Resolution::entries`.

use crate::domain::{ResolvedEntry, SkippedPackage};
use crate::orchestrator::{OrchestratorResult, Outcome};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    ecosystem: &'static str,
    /// Registry name or index path
    source: &'a str,
    resolved_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a BTreeMap<String, ResolvedEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'a [SkippedPackage]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraints: Option<&'a BTreeMap<String, String>>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let mut output = JsonOutput {
            ecosystem: result.ecosystem.identifier(),
            source: &result.source,
            resolved_at: Utc::now(),
            resolution: None,
            skipped: None,
            constraints: None,
        };
        match &result.outcome {
            Outcome::Resolved(resolution) => {
                output.resolution = Some(&resolution.entries);
                output.skipped = Some(resolution.skipped.as_slice());
            }
            Outcome::Restricted(composed) => output.constraints = Some(composed),
        }

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ecosystem, Resolution};

    fn render(result: &OrchestratorResult) -> serde_json::Value {
        let mut output = Vec::new();
        JsonFormatter::new().format(result, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_format_resolution() {
        let mut resolution = Resolution::new();
        resolution
            .entries
            .insert("foo".to_string(), ResolvedEntry::Latest("1.5.0".to_string()));
        resolution.entries.insert(
            "bar".to_string(),
            ResolvedEntry::All(vec!["1.0.0".to_string(), "1.1.0".to_string()]),
        );
        resolution
            .entries
            .insert("baz".to_string(), ResolvedEntry::Unmatched);
        resolution
            .skipped
            .push(SkippedPackage::new("ghost", "registry lists no releases"));
        let result = OrchestratorResult {
            ecosystem: Ecosystem::PyPI,
            source: "PyPI".to_string(),
            outcome: Outcome::Resolved(resolution),
        };

        let parsed = render(&result);
        assert_eq!(parsed["ecosystem"], "pypi");
        assert_eq!(parsed["source"], "PyPI");
        assert!(parsed["resolved_at"].is_string());
        assert_eq!(parsed["resolution"]["foo"], "1.5.0");
        assert_eq!(parsed["resolution"]["bar"][1], "1.1.0");
        assert!(parsed["resolution"]["baz"].is_null());
        assert_eq!(parsed["skipped"][0]["name"], "ghost");
        assert!(parsed.get("constraints").is_none());
    }

    #[test]
    fn test_format_restricted() {
        let mut composed = BTreeMap::new();
        composed.insert("lodash".to_string(), ">=4.17.0 <5.0.0".to_string());
        let result = OrchestratorResult {
            ecosystem: Ecosystem::Npm,
            source: "npm".to_string(),
            outcome: Outcome::Restricted(composed),
        };

        let parsed = render(&result);
        assert_eq!(parsed["constraints"]["lodash"], ">=4.17.0 <5.0.0");
        assert!(parsed.get("resolution").is_none());
        assert!(parsed.get("skipped").is_none());
    }
}
