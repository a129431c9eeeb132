//! Linter output parsing and severity classification.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintEntry {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
    pub rule: Option<String>,
    pub severity: Severity,
}

impl LintEntry {
    /// An entry without location, e.g. a line the pattern did not match.
    pub fn unstructured(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            line: None,
            column: None,
            message: message.into(),
            rule: None,
            severity,
        }
    }
}

const ERROR_KEYWORDS: &[&str] = &["error", "invalid", "required"];
const WARNING_KEYWORDS: &[&str] = &["deprecated", "recommend"];

/// `file:line:col: message [rule]`
fn line_regex() -> &'static Regex {
    static LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    LINE_REGEX.get_or_init(|| {
        Regex::new(r"^(.+?):(\d+):(\d+): (.*?)(?: \[([\w-]+)\])?$").expect("valid regex")
    })
}

pub fn classify(message: &str) -> Severity {
    let lower = message.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Error
    } else if WARNING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Parse one output line. Returns `None` when it does not match the pattern.
pub fn parse_line(line: &str) -> Option<LintEntry> {
    let caps = line_regex().captures(line.trim_end())?;
    let message = caps.get(4)?.as_str().to_string();
    Some(LintEntry {
        line: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        column: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        rule: caps.get(5).map(|m| m.as_str().to_string()),
        severity: classify(&message),
        message,
    })
}

/// Parse every line of linter output. Lines that do not match are kept
/// verbatim as `Info` entries without a location.
pub fn parse_output(output: &str) -> Vec<LintEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            parse_line(line).unwrap_or_else(|| LintEntry::unstructured(line.trim_end(), Severity::Info))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_located_line_with_rule() {
        let entry =
            parse_line("file.yml:5:3: required property 'runs-on' is missing [syntax-check]")
                .unwrap();
        assert_eq!(entry.line, Some(5));
        assert_eq!(entry.column, Some(3));
        assert_eq!(entry.rule.as_deref(), Some("syntax-check"));
        assert_eq!(entry.message, "required property 'runs-on' is missing");
        assert_eq!(entry.severity, Severity::Error);
    }

    #[test]
    fn rule_is_optional() {
        let entry = parse_line("<stdin>:12:9: shellcheck reported issue").unwrap();
        assert_eq!(entry.rule, None);
        assert_eq!(entry.message, "shellcheck reported issue");
        assert_eq!(entry.severity, Severity::Info);
    }

    #[test]
    fn keyword_classification() {
        assert_eq!(classify("Invalid expression syntax"), Severity::Error);
        assert_eq!(classify("the \"set-output\" command is deprecated"), Severity::Warning);
        assert_eq!(classify("we recommend pinning the action"), Severity::Warning);
        assert_eq!(classify("label is unusual"), Severity::Info);
        // Error keywords win over warning keywords.
        assert_eq!(classify("deprecated input is required"), Severity::Error);
    }

    #[test]
    fn unmatched_lines_are_preserved() {
        let entries = parse_output(
            "   |\n\nw.yml:1:1: unexpected key \"job\" [syntax-check]\n   ^~~~ here\n",
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "   |");
        assert_eq!(entries[1].line, Some(1));
        assert_eq!(entries[2].message, "   ^~~~ here");
        assert!(entries[2].line.is_none());
    }
}
