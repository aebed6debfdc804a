//! `.env` syntax: parsing lines and rendering assignments.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{EnvVars, is_valid_key};

/// One physical line of a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Line {
    /// `KEY=value`, with the text it was read from.
    Assignment {
        key: String,
        value: String,
        raw: String,
    },
    /// Blank lines, comments and anything unparseable, kept verbatim.
    Other(String),
}

/// Splits a document into lines. `${NAME}` references resolve against
/// assignments above them, then the process environment.
pub(super) fn parse_document(content: &str) -> Vec<Line> {
    let mut seen = EnvVars::new();
    content
        .lines()
        .map(|line| {
            let line = parse_line_in(line, &seen);
            if let Line::Assignment { key, value, .. } = &line {
                seen.set(key.as_str(), value.as_str());
            }
            line
        })
        .collect()
}

/// Collects the assignments of a parsed document. Later duplicates win.
pub(super) fn vars_from(lines: &[Line]) -> EnvVars {
    lines
        .iter()
        .filter_map(|line| match line {
            Line::Assignment { key, value, .. } => Some((key.clone(), value.clone())),
            Line::Other(_) => None,
        })
        .collect()
}

/// Parses a line on its own, with nothing defined above it.
pub(super) fn parse_line(line: &str) -> Line {
    parse_line_in(line, &EnvVars::new())
}

fn parse_line_in(line: &str, above: &EnvVars) -> Line {
    let other = || Line::Other(line.to_string());

    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return other();
    }

    let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let Some((key, rest)) = body.split_once('=') else {
        return other();
    };

    let key = key.trim();
    if !is_valid_key(key) {
        return other();
    }

    let value = match parse_value(rest) {
        Value::Literal(text) => text,
        Value::Expandable(text) => expand(&text, above),
    };

    Line::Assignment {
        key: key.to_string(),
        value,
        raw: line.to_string(),
    }
}

/// A value after unquoting. Single-quoted text is never expanded.
enum Value {
    Literal(String),
    Expandable(String),
}

fn parse_value(text: &str) -> Value {
    let text = text.trim_start();

    if let Some(inner) = text.strip_prefix('\'') {
        return match unquote(inner, '\'', single_quote_escape) {
            Some(value) => Value::Literal(value),
            None => Value::Literal(text.trim_end().to_string()),
        };
    }

    if let Some(inner) = text.strip_prefix('"') {
        return match unquote(inner, '"', double_quote_escape) {
            Some(value) => Value::Expandable(value),
            None => Value::Literal(text.trim_end().to_string()),
        };
    }

    Value::Expandable(strip_inline_comment(text).trim_end().to_string())
}

/// Reads up to the closing unescaped `quote`. `None` if there is none.
///
/// A backslash followed by a character `escape` does not map is kept
/// together with that character.
fn unquote(inner: &str, quote: char, escape: fn(char) -> Option<char>) -> Option<String> {
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return Some(value);
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => match escape(next) {
                Some(unescaped) => value.push(unescaped),
                None => {
                    value.push('\\');
                    value.push(next);
                }
            },
            None => value.push('\\'),
        }
    }

    None
}

const fn single_quote_escape(c: char) -> Option<char> {
    match c {
        '\\' | '\'' => Some(c),
        _ => None,
    }
}

const fn double_quote_escape(c: char) -> Option<char> {
    match c {
        '\\' | '\'' | '"' => Some(c),
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        _ => None,
    }
}

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}:]*)(?::-([^}]*))?\}").unwrap_or_else(|e| unreachable!("{e}"))
});

/// Replaces `${NAME}` and `${NAME:-default}`. Unknown names without a
/// default become empty.
fn expand(text: &str, above: &EnvVars) -> String {
    if !text.contains("${") {
        return text.to_string();
    }

    VARIABLE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            above
                .get(name)
                .map(ToString::to_string)
                .or_else(|| std::env::var(name).ok())
                .or_else(|| caps.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Cuts an unquoted value at a `#` that follows whitespace.
fn strip_inline_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return &text[..i];
        }
    }
    text
}

/// Renders `KEY=value`, quoting the value when bare text would not read
/// back identically.
pub(super) fn format_assignment(key: &str, value: &str) -> String {
    format!("{key}={}", quote_value(value))
}

fn quote_value(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }

    // Single quotes suppress `${}` expansion but cannot span lines here.
    let multiline = value.contains(['\n', '\r']);
    let quote = if multiline { '"' } else { '\'' };

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(quote);
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ if c == quote => {
                quoted.push('\\');
                quoted.push(c);
            }
            _ => quoted.push(c),
        }
    }
    quoted.push(quote);
    quoted
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'))
}

/// Renders `vars` over an existing document.
///
/// Assignment lines keep their position; an unchanged value keeps its
/// original text. Keys no longer present are dropped, later duplicate
/// lines of a key are dropped, and new keys are appended in order.
pub(super) fn render(lines: &[Line], vars: &EnvVars) -> String {
    let mut written: Vec<&str> = Vec::new();
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + vars.len());

    for line in lines {
        match line {
            Line::Other(raw) => out.push(raw.clone()),
            Line::Assignment { key, value, raw } => {
                if written.contains(&key.as_str()) {
                    continue;
                }
                let Some(new_value) = vars.get(key) else {
                    continue;
                };
                written.push(key);
                if new_value == value {
                    out.push(raw.clone());
                } else {
                    out.push(format_assignment(key, new_value));
                }
            }
        }
    }

    for (key, value) in vars.iter() {
        if !written.contains(&key) {
            out.push(format_assignment(key, value));
        }
    }

    let mut rendered = out.join("\n");
    rendered.push('\n');
    rendered
}
