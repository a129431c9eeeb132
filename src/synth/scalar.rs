//! YAML scalar rendering.
//!
//! Values stay plain unless a YAML reader would change their meaning
//! (booleans, numbers, nulls, indicators); those are double-quoted.

/// Words a YAML 1.1 or 1.2 reader resolves to a non-string.
const RESERVED: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~", ".inf", "+.inf", "-.inf",
    ".nan",
];

/// Characters that may not start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

/// Render a single-line scalar, quoting when needed.
pub fn scalar(value: &str) -> String {
    if needs_quotes(value) {
        double_quoted(value)
    } else {
        value.to_string()
    }
}

/// How a (possibly multi-line) value should be written after `key:`.
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered<'a> {
    Inline(String),
    /// Literal block: header (`|` or `|-`) and body lines.
    Block { header: &'static str, lines: Vec<&'a str> },
}

pub fn render(value: &str) -> Rendered<'_> {
    if !value.contains('\n') {
        return Rendered::Inline(scalar(value));
    }

    let (header, body) = match value.strip_suffix('\n') {
        Some(rest) if !rest.ends_with('\n') => ("|", rest),
        Some(_) => return Rendered::Inline(double_quoted(value)),
        None => ("|-", value),
    };

    let first_content = body.lines().find(|l| !l.is_empty());
    let block_safe = match first_content {
        Some(first) => !first.starts_with([' ', '\t']),
        None => false,
    };
    if !block_safe || body.chars().any(|c| c == '\r' || is_unprintable(c)) {
        return Rendered::Inline(double_quoted(value));
    }

    Rendered::Block {
        header,
        lines: body.split('\n').collect(),
    }
}

fn needs_quotes(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };

    if first.is_whitespace() || value.ends_with(char::is_whitespace) {
        return true;
    }
    if INDICATORS.contains(&first) {
        return true;
    }
    if value.contains(": ") || value.contains(" #") || value.ends_with(':') {
        return true;
    }
    if value.chars().any(|c| c == '\n' || c == '\r' || c == '\t' || is_unprintable(c)) {
        return true;
    }
    if RESERVED.contains(&value.to_ascii_lowercase().as_str()) {
        return true;
    }
    looks_numeric(value)
}

fn looks_numeric(value: &str) -> bool {
    if value.parse::<f64>().is_ok() || value.replace('_', "").parse::<f64>().is_ok() {
        return true;
    }

    let lower = value.to_ascii_lowercase();
    let unsigned = lower.strip_prefix(['+', '-']).unwrap_or(lower.as_str());
    if let Some(hex) = unsigned.strip_prefix("0x") {
        return digits_in(hex, |c| c.is_ascii_hexdigit());
    }
    if let Some(octal) = unsigned.strip_prefix("0o") {
        return digits_in(octal, |c| ('0'..='7').contains(&c));
    }
    if let Some(binary) = unsigned.strip_prefix("0b") {
        return digits_in(binary, |c| c == '0' || c == '1');
    }

    // YAML 1.1 sexagesimal, e.g. `1:30`.
    value.contains(':')
        && value
            .split(':')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit() || c == '.'))
}

/// YAML 1.1 readers accept `_` separators inside radix literals.
fn digits_in(digits: &str, valid: impl Fn(char) -> bool) -> bool {
    digits.chars().any(&valid) && digits.chars().all(|c| c == '_' || valid(c))
}

/// Characters that cannot appear raw in a plain or block scalar. U+2028 and
/// U+2029 count as line breaks to a YAML reader.
fn is_unprintable(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t')
        || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}')
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if is_unprintable(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
