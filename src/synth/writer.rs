//! Indent-aware string builder for YAML generation.
//!
//! GitHub Actions workflows use 2-space indentation, with sequence items
//! nested one level under their parent key. Keys are written verbatim; callers
//! pass user-supplied keys through `scalar::scalar` first.

use super::scalar::{self, Rendered};

/// Indent-aware string builder that produces block-style YAML.
pub struct YamlWriter {
    buf: String,
    indent_level: usize,
}

impl YamlWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(4096),
            indent_level: 0,
        }
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write an empty line without indentation.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `key:` and indent for a nested mapping or sequence.
    pub fn map_open(&mut self, key: &str) {
        self.line(&format!("{key}:"));
        self.indent();
    }

    /// Close a nested block opened with `map_open` or `item_open`.
    pub fn close(&mut self) {
        self.dedent();
    }

    /// Write `key:` with no value (YAML null).
    pub fn empty_entry(&mut self, key: &str) {
        self.line(&format!("{key}:"));
    }

    /// Write `key: value`, switching to a literal block for multi-line text.
    pub fn entry(&mut self, key: &str, value: &str) {
        self.prefixed_entry("", key, value, 1);
    }

    /// Write `key: value` where `value` is already valid YAML (e.g. `true`).
    pub fn raw_entry(&mut self, key: &str, value: &str) {
        self.line(&format!("{key}: {value}"));
    }

    /// Write `- value` for a scalar sequence item.
    pub fn item(&mut self, value: &str) {
        self.line(&format!("- {}", scalar::scalar(value)));
    }

    /// Start a mapping sequence item: `- key: value`, then indent so the
    /// following keys line up under `key`.
    pub fn item_open(&mut self, key: &str, value: &str) {
        self.prefixed_entry("- ", key, value, 2);
        self.indent();
    }

    /// Consume the writer and return the generated document.
    pub fn finish(self) -> String {
        self.buf
    }

    fn prefixed_entry(&mut self, prefix: &str, key: &str, value: &str, body_depth: usize) {
        match scalar::render(value) {
            Rendered::Inline(v) => self.line(&format!("{prefix}{key}: {v}")),
            Rendered::Block { header, lines } => {
                self.line(&format!("{prefix}{key}: {header}"));
                self.indent_level += body_depth;
                for l in lines {
                    if l.is_empty() {
                        self.blank();
                    } else {
                        self.line(l);
                    }
                }
                self.indent_level -= body_depth;
            }
        }
    }
}

impl Default for YamlWriter {
    fn default() -> Self {
        Self::new()
    }
}
