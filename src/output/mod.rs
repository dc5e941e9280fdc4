//! Rendering of orchestrator results
//!
//! `--json` selects [`JsonFormatter`]; everything else goes through
//! [`TextFormatter`] at the verbosity picked by `-q` / `-v`.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// How much the text formatter prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// One `name version` line per package
    Quiet,
    #[default]
    Normal,
    /// Also list every matching release and skip details
    Verbose,
}

/// Writes an orchestrator result
pub trait OutputFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Pick the formatter for a command line; `colored` drops colors off a terminal
pub fn formatter_for(args: &CliArgs) -> Box<dyn OutputFormatter> {
    if args.json {
        Box::new(JsonFormatter::new())
    } else {
        Box::new(TextFormatter::new(args.verbosity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ecosystem;
    use crate::orchestrator::Outcome;
    use clap::Parser;
    use std::collections::BTreeMap;

    fn restricted() -> OrchestratorResult {
        let mut composed = BTreeMap::new();
        composed.insert("foo".to_string(), ">=1.2.0 <1.8.0".to_string());
        OrchestratorResult {
            ecosystem: Ecosystem::Npm,
            source: "npm".to_string(),
            outcome: Outcome::Restricted(composed),
        }
    }

    fn render(argv: &[&str]) -> String {
        let args = CliArgs::parse_from(argv);
        let mut output = Vec::new();
        formatter_for(&args)
            .format(&restricted(), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_json_flag_selects_json() {
        let output = render(&["depsolve", "npm", "foo", "--json", "-q"]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["constraints"]["foo"], ">=1.2.0 <1.8.0");
    }

    #[test]
    fn test_quiet_text_output() {
        let output = render(&["depsolve", "npm", "foo", "-q"]);
        assert_eq!(output, "foo >=1.2.0 <1.8.0\n");
    }
}
