//! Checks a variable mapping against what the service expects to read.

use std::fmt;

use crate::filter::{self, PatternIssue, RegexFormat};

use super::{EnvVars, keys};

/// Variables the service refuses to start without.
const REQUIRED: [&str; 3] = [
    keys::OVERSEERR_BASE,
    keys::OVERSEERR_API_KEY,
    keys::TRAKT_API_KEY,
];

/// Variables read as `true`/`false`.
const BOOLEAN: [&str; 3] = [
    keys::HEADLESS_MODE,
    keys::ENABLE_AUTOMATIC_BACKGROUND_TASK,
    keys::ENABLE_SHOW_SUBSCRIPTION_TASK,
];

/// Smallest refresh interval the service accepts, in minutes.
const MIN_REFRESH_MINUTES: f64 = 1.0;

/// A problem the service would hit when reading the mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvIssue {
    /// A required variable is absent or blank.
    MissingRequired(&'static str),

    /// A boolean variable holds something other than `true`/`false`.
    InvalidBoolean {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// The refresh interval is not a number.
    InvalidInterval(String),

    /// The refresh interval is below the minimum; the service clamps it.
    IntervalTooShort(f64),

    /// The filter value could not be parsed at all.
    InvalidFilter(String),

    /// A pattern inside the filter value is unusable.
    InvalidPattern {
        /// Zero-based position in the list
        index: usize,
        /// What is wrong with it
        issue: PatternIssue,
    },
}

impl EnvIssue {
    /// Returns the variable the issue is about.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::MissingRequired(key) | Self::InvalidBoolean { key, .. } => *key,
            Self::InvalidInterval(_) | Self::IntervalTooShort(_) => keys::REFRESH_INTERVAL_MINUTES,
            Self::InvalidFilter(_) | Self::InvalidPattern { .. } => keys::TORRENT_FILTER_REGEX,
        }
    }
}

impl fmt::Display for EnvIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired(key) => write!(f, "{key} is required"),
            Self::InvalidBoolean { key, value } => {
                write!(f, "{key} must be 'true' or 'false', got '{value}'")
            }
            Self::InvalidInterval(value) => write!(
                f,
                "{} must be a number of minutes, got '{value}'",
                keys::REFRESH_INTERVAL_MINUTES
            ),
            Self::IntervalTooShort(minutes) => write!(
                f,
                "{} is {minutes}, below the minimum of {MIN_REFRESH_MINUTES}",
                keys::REFRESH_INTERVAL_MINUTES
            ),
            Self::InvalidFilter(reason) => {
                write!(f, "{}: {reason}", keys::TORRENT_FILTER_REGEX)
            }
            Self::InvalidPattern { index, issue } => write!(
                f,
                "{} pattern {}: {issue}",
                keys::TORRENT_FILTER_REGEX,
                index + 1
            ),
        }
    }
}

/// Lists every issue found in `vars`. An empty list means the service
/// should read the mapping without complaint.
#[must_use]
pub fn audit(vars: &EnvVars) -> Vec<EnvIssue> {
    let mut issues = Vec::new();

    for key in REQUIRED {
        if vars.get(key).is_none_or(|v| v.trim().is_empty()) {
            issues.push(EnvIssue::MissingRequired(key));
        }
    }

    for key in BOOLEAN {
        if let Some(value) = vars.get(key) {
            if !matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "false") {
                issues.push(EnvIssue::InvalidBoolean {
                    key,
                    value: value.to_string(),
                });
            }
        }
    }

    if let Some(value) = vars.get(keys::REFRESH_INTERVAL_MINUTES) {
        match value.trim().parse::<f64>() {
            Ok(minutes) if !minutes.is_finite() => {
                issues.push(EnvIssue::InvalidInterval(value.to_string()));
            }
            Ok(minutes) if minutes < MIN_REFRESH_MINUTES => {
                issues.push(EnvIssue::IntervalTooShort(minutes));
            }
            Ok(_) => {}
            Err(_) => issues.push(EnvIssue::InvalidInterval(value.to_string())),
        }
    }

    audit_filter(vars.get(keys::TORRENT_FILTER_REGEX), &mut issues);

    issues
}

fn audit_filter(raw: Option<&str>, issues: &mut Vec<EnvIssue>) {
    let parsed = filter::parse(raw);

    if !parsed.is_valid {
        let reason = parsed
            .error
            .unwrap_or_else(|| "Invalid regex syntax".to_string());
        issues.push(EnvIssue::InvalidFilter(reason));
        return;
    }

    if parsed.format != RegexFormat::Array {
        return;
    }

    let validation = filter::validate_pattern_list(&parsed.patterns);
    issues.extend(
        validation
            .errors
            .into_iter()
            .map(|(index, issue)| EnvIssue::InvalidPattern { index, issue }),
    );
}
