//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Aligned package/version listing with colors
//! - Skipped package display with reasons
//! - Restricted constraint listing

use crate::domain::{Resolution, ResolvedEntry};
use crate::orchestrator::{OrchestratorResult, Outcome};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Render an entry as a version list
    fn entry_display(entry: &ResolvedEntry) -> Option<String> {
        match entry {
            ResolvedEntry::Unmatched => None,
            other => Some(other.versions().join(", ")),
        }
    }

    fn max_name_length<'a>(names: impl Iterator<Item = &'a String>) -> usize {
        names.map(|n| n.len()).max().unwrap_or(0).max(20)
    }

    fn write_header(
        &self,
        result: &OrchestratorResult,
        counts: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        let ecosystem = result.ecosystem.display_name();
        if self.color {
            writeln!(
                writer,
                "{} {}: {}",
                ecosystem.bold(),
                format!("({})", result.source).dimmed(),
                counts
            )
        } else {
            writeln!(writer, "{} ({}): {}", ecosystem, result.source, counts)
        }
    }

    fn format_resolution(
        &self,
        result: &OrchestratorResult,
        resolution: &Resolution,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let matched = resolution.matched_count();
        let unmatched = resolution.len() - matched;
        let mut counts = format!("{} resolved, {} unmatched", matched, unmatched);
        if !resolution.skipped.is_empty() {
            counts.push_str(&format!(", {} skipped", resolution.skipped.len()));
        }
        self.write_header(result, &counts, writer)?;

        if self.verbosity == Verbosity::Quiet {
            for (name, entry) in &resolution.entries {
                let display = Self::entry_display(entry).unwrap_or_else(|| "-".to_string());
                writeln!(writer, "{} {}", name, display)?;
            }
            return Ok(());
        }

        let width = Self::max_name_length(
            resolution
                .entries
                .keys()
                .chain(resolution.skipped.iter().map(|s| &s.name)),
        );

        for (name, entry) in &resolution.entries {
            match (Self::entry_display(entry), self.color) {
                (Some(versions), true) => writeln!(
                    writer,
                    "  {:width$} {}",
                    name,
                    versions.bright_white().bold(),
                    width = width
                )?,
                (Some(versions), false) => {
                    writeln!(writer, "  {:width$} {}", name, versions, width = width)?
                }
                (None, true) => writeln!(
                    writer,
                    "  {:width$} {}",
                    name,
                    "no matching release".yellow(),
                    width = width
                )?,
                (None, false) => writeln!(
                    writer,
                    "  {:width$} no matching release",
                    name,
                    width = width
                )?,
            }
        }

        if !resolution.skipped.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            for skipped in &resolution.skipped {
                let reason = if self.verbosity == Verbosity::Verbose {
                    format!("({})", skipped.reason)
                } else {
                    String::new()
                };
                let line = format!("{:width$} {}", skipped.name, reason, width = width);
                if self.color {
                    writeln!(writer, "  {}", line.trim_end().dimmed())?;
                } else {
                    writeln!(writer, "  {}", line.trim_end())?;
                }
            }
        }

        Ok(())
    }

    fn format_restricted(
        &self,
        result: &OrchestratorResult,
        composed: &BTreeMap<String, String>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let counts = format!(
            "{} {}",
            composed.len(),
            if composed.len() == 1 {
                "constraint"
            } else {
                "constraints"
            }
        );
        self.write_header(result, &counts, writer)?;

        if self.verbosity == Verbosity::Quiet {
            for (name, specifier) in composed {
                writeln!(writer, "{} {}", name, specifier)?;
            }
            return Ok(());
        }

        let width = Self::max_name_length(composed.keys());
        for (name, specifier) in composed {
            if self.color {
                writeln!(writer, "  {:width$} {}", name, specifier.cyan(), width = width)?;
            } else {
                writeln!(writer, "  {:width$} {}", name, specifier, width = width)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        match &result.outcome {
            Outcome::Resolved(resolution) => self.format_resolution(result, resolution, writer),
            Outcome::Restricted(composed) => self.format_restricted(result, composed, writer),
        }
    }
}
