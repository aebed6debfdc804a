//! Format detection, parsing and serialization of the stored filter value.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Error text for a bracketed value that is not valid JSON.
const INVALID_JSON: &str = "Invalid JSON format";

/// Error text for a JSON array holding anything other than strings.
const NON_STRING_VALUES: &str = "Array contains non-string values";

/// Encoding used by a stored filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegexFormat {
    /// Absent or whitespace-only value.
    Empty,
    /// A single bare regular expression (legacy mode).
    #[serde(rename = "string")]
    Single,
    /// A JSON array of regular expressions in priority order.
    Array,
}

impl RegexFormat {
    /// Returns the lowercase tag used in logs and command output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Single => "string",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for RegexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of a stored filter value.
///
/// Produced by [`parse`]. Invalid input never causes a failure; it is
/// reported through `is_valid` and, for array values, `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRegexValue {
    /// How the stored text was encoded.
    pub format: RegexFormat,
    /// Patterns in priority order.
    pub patterns: Vec<String>,
    /// The trimmed stored text.
    pub raw: String,
    /// Whether the value parsed and every structural constraint held.
    pub is_valid: bool,
    /// Diagnostic for invalid array values.
    ///
    /// Always `None` for [`RegexFormat::Single`], even when the pattern does
    /// not compile; callers only get `is_valid` in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedRegexValue {
    fn empty() -> Self {
        Self {
            format: RegexFormat::Empty,
            patterns: Vec::new(),
            raw: String::new(),
            is_valid: true,
            error: None,
        }
    }

    fn invalid_array(raw: &str, reason: &str) -> Self {
        Self {
            format: RegexFormat::Array,
            patterns: Vec::new(),
            raw: raw.to_string(),
            is_valid: false,
            error: Some(reason.to_string()),
        }
    }

    /// Returns the patterns as a priority list.
    ///
    /// A single-pattern value converts to a one-element list; serializing
    /// that list gives back the original bare string.
    #[must_use]
    pub fn to_array(&self) -> Vec<String> {
        self.patterns.clone()
    }

    /// Returns `true` if the stored value was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format == RegexFormat::Empty
    }
}

/// Detects the encoding of a stored filter value.
///
/// - `None`, empty or whitespace-only text is [`RegexFormat::Empty`].
/// - Text that starts with `[`, ends with `]` and parses as a JSON array
///   (any element types) is [`RegexFormat::Array`].
/// - Anything else, including malformed bracketed text and JSON that is not
///   an array, is [`RegexFormat::Single`].
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::{RegexFormat, detect_format};
///
/// assert_eq!(detect_format(None), RegexFormat::Empty);
/// assert_eq!(detect_format(Some("  ")), RegexFormat::Empty);
/// assert_eq!(detect_format(Some(r#"["a","b"]"#)), RegexFormat::Array);
/// assert_eq!(detect_format(Some("[1080p")), RegexFormat::Single);
/// assert_eq!(detect_format(Some("[a-z]")), RegexFormat::Single);
/// ```
#[must_use]
pub fn detect_format(value: Option<&str>) -> RegexFormat {
    let trimmed = value.map_or("", str::trim);

    if trimmed.is_empty() {
        return RegexFormat::Empty;
    }

    if looks_like_array(trimmed)
        && matches!(serde_json::from_str::<Value>(trimmed), Ok(Value::Array(_)))
    {
        return RegexFormat::Array;
    }

    RegexFormat::Single
}

fn looks_like_array(text: &str) -> bool {
    text.starts_with('[') && text.ends_with(']')
}

/// Parses a stored filter value into a [`ParsedRegexValue`].
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::{RegexFormat, parse};
///
/// let parsed = parse(Some(r#"["2160p","1080p"]"#));
/// assert_eq!(parsed.format, RegexFormat::Array);
/// assert_eq!(parsed.patterns, vec!["2160p", "1080p"]);
/// assert!(parsed.is_valid);
///
/// let parsed = parse(Some("[1,2]"));
/// assert!(!parsed.is_valid);
/// assert_eq!(parsed.error.as_deref(), Some("Array contains non-string values"));
/// ```
#[must_use]
pub fn parse(value: Option<&str>) -> ParsedRegexValue {
    let trimmed = value.map_or("", str::trim);

    match detect_format(Some(trimmed)) {
        RegexFormat::Empty => ParsedRegexValue::empty(),
        RegexFormat::Array => parse_array(trimmed),
        RegexFormat::Single => ParsedRegexValue {
            format: RegexFormat::Single,
            patterns: vec![trimmed.to_string()],
            raw: trimmed.to_string(),
            is_valid: Regex::new(trimmed).is_ok(),
            error: None,
        },
    }
}

fn parse_array(raw: &str) -> ParsedRegexValue {
    let Ok(items) = serde_json::from_str::<Vec<Value>>(raw) else {
        return ParsedRegexValue::invalid_array(raw, INVALID_JSON);
    };

    let patterns: Option<Vec<String>> = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    match patterns {
        Some(patterns) => ParsedRegexValue {
            format: RegexFormat::Array,
            patterns,
            raw: raw.to_string(),
            is_valid: true,
            error: None,
        },
        None => ParsedRegexValue::invalid_array(raw, NON_STRING_VALUES),
    }
}

/// Serializes a priority list to its storage form.
///
/// - No patterns: the empty string.
/// - One pattern: the pattern itself, untouched.
/// - Two or more: a compact JSON array of strings.
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::serialize;
///
/// assert_eq!(serialize::<&str>(&[]), "");
/// assert_eq!(serialize(&["(720p|1080p).*"]), "(720p|1080p).*");
/// assert_eq!(serialize(&["a", "b", "c"]), r#"["a","b","c"]"#);
/// ```
#[must_use]
pub fn serialize<S: AsRef<str>>(patterns: &[S]) -> String {
    match patterns {
        [] => String::new(),
        [single] => single.as_ref().to_string(),
        many => Value::Array(
            many.iter()
                .map(|p| Value::String(p.as_ref().to_string()))
                .collect(),
        )
        .to_string(),
    }
}

/// Seed list shown for a brand-new or empty configuration.
///
/// Ordered from most to least preferred: 4K remuxes and Blu-ray, then
/// 1080p Blu-ray/WEB releases, then anything 720p or 1080p.
#[must_use]
pub fn default_patterns() -> Vec<String> {
    vec![
        r"(?i)^(?:.*(?:2160p|4k|uhd)).*(?:remux|bluray)".to_string(),
        r"(?i)^(?:.*1080p).*(?:bluray|web-?dl)".to_string(),
        r"(?i)(?:720p|1080p)".to_string(),
    ]
}
