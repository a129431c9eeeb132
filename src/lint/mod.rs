//! Validation bridge: runs an external workflow linter (actionlint by
//! default) over generated YAML and normalizes what it prints.
//!
//! `validate` never fails. Tool problems (missing binary, timeout, crash)
//! come back as one synthetic error entry so a flaky linter cannot take the
//! caller down with it.

pub mod output;
pub mod runner;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use output::{LintEntry, Severity, classify, parse_line, parse_output};
pub use runner::{FORMAT_TEMPLATE, ToolError, ToolOutput, run_linter};

pub const PROGRAM_ENV: &str = "ACTIONLINT_PATH";
pub const TIMEOUT_ENV: &str = "ACTIONLINT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments placed before the format flags.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl LinterConfig {
    /// Defaults with `ACTIONLINT_PATH` / `ACTIONLINT_TIMEOUT_MS` applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(program) = std::env::var(PROGRAM_ENV) {
            if !program.trim().is_empty() {
                self.program = program;
            }
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            if let Ok(parsed) = timeout.trim().parse::<u64>() {
                self.timeout_ms = parsed;
            }
        }
    }
}

fn default_program() -> String {
    "actionlint".to_string()
}

fn default_timeout_ms() -> u64 {
    8_000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// False iff `errors` is non-empty.
    pub valid: bool,
    pub errors: Vec<LintEntry>,
    pub warnings: Vec<LintEntry>,
    pub suggestions: Vec<LintEntry>,
}

impl LintReport {
    pub fn from_entries(entries: impl IntoIterator<Item = LintEntry>) -> Self {
        let mut report = LintReport::default();
        for entry in entries {
            match entry.severity {
                Severity::Error => report.errors.push(entry),
                Severity::Warning => report.warnings.push(entry),
                Severity::Info => report.suggestions.push(entry),
            }
        }
        report.valid = report.errors.is_empty();
        report
    }

    fn tool_failure(error: &ToolError) -> Self {
        Self::from_entries([LintEntry::unstructured(error.to_string(), Severity::Error)])
    }
}

/// Lint `yaml` with the configured tool.
pub fn validate(yaml: &str, config: &LinterConfig) -> LintReport {
    let output = match run_linter(yaml, config) {
        Ok(output) => output,
        Err(e) => return LintReport::tool_failure(&e),
    };

    let mut entries = parse_output(&output.stdout);
    entries.extend(parse_output(&output.stderr));

    let located = entries.iter().any(|e| e.line.is_some());
    if !output.status.success() && !located {
        let detail = match output.status.code() {
            Some(code) => format!("linter exited with status {code}"),
            None => "linter was terminated by a signal".to_string(),
        };
        entries.push(LintEntry::unstructured(detail, Severity::Error));
    }

    let report = LintReport::from_entries(entries);
    debug!(
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        suggestions = report.suggestions.len(),
        "linted workflow"
    );
    report
}
