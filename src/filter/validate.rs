//! Pattern and priority list validation.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::Serialize;

/// Diagnostic attached to a single position of a priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternIssue {
    /// The pattern is empty or whitespace-only.
    Empty,
    /// The pattern does not compile as a regular expression.
    InvalidSyntax,
    /// The trimmed pattern equals the trimmed pattern at an earlier position.
    Duplicate,
}

impl PatternIssue {
    /// Returns the human-readable message for this diagnostic.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Empty => "Pattern cannot be empty",
            Self::InvalidSyntax => "Invalid regex syntax",
            Self::Duplicate => "Duplicate pattern",
        }
    }
}

impl fmt::Display for PatternIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of validating a whole priority list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListValidation {
    /// `true` iff no position carries a diagnostic.
    pub is_valid: bool,
    /// Diagnostics keyed by zero-based position. One entry per position.
    pub errors: BTreeMap<usize, PatternIssue>,
}

impl ListValidation {
    /// Returns the diagnostic for `index`, if any.
    #[must_use]
    pub fn issue_at(&self, index: usize) -> Option<PatternIssue> {
        self.errors.get(&index).copied()
    }
}

/// Returns `true` if `pattern` is non-blank and compiles as a regular
/// expression.
///
/// The dialect is the one implemented by the `regex` crate, so look-around
/// and backreferences are rejected.
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::validate_pattern;
///
/// assert!(validate_pattern("(720p|1080p).*"));
/// assert!(!validate_pattern(""));
/// assert!(!validate_pattern("("));
/// ```
#[must_use]
pub fn validate_pattern(pattern: &str) -> bool {
    check_pattern(pattern).is_none()
}

fn check_pattern(pattern: &str) -> Option<PatternIssue> {
    if pattern.trim().is_empty() {
        return Some(PatternIssue::Empty);
    }

    if Regex::new(pattern).is_err() {
        return Some(PatternIssue::InvalidSyntax);
    }

    None
}

/// Validates every position of a priority list.
///
/// Each position is first checked on its own (empty, then syntax). A
/// second pass flags every position whose trimmed text already appeared at
/// an earlier position. Both passes write into the same position-keyed map,
/// so when a position is both invalid and a duplicate only
/// [`PatternIssue::Duplicate`] is kept.
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::{PatternIssue, validate_pattern_list};
///
/// let result = validate_pattern_list(&["a", "b", "a"]);
/// assert!(!result.is_valid);
/// assert_eq!(result.issue_at(2), Some(PatternIssue::Duplicate));
/// assert_eq!(result.issue_at(0), None);
/// ```
#[must_use]
pub fn validate_pattern_list<S: AsRef<str>>(patterns: &[S]) -> ListValidation {
    let mut errors: BTreeMap<usize, PatternIssue> = patterns
        .iter()
        .enumerate()
        .filter_map(|(index, pattern)| check_pattern(pattern.as_ref()).map(|issue| (index, issue)))
        .collect();

    let mut seen = HashSet::with_capacity(patterns.len());
    for (index, pattern) in patterns.iter().enumerate() {
        if !seen.insert(pattern.as_ref().trim()) {
            errors.insert(index, PatternIssue::Duplicate);
        }
    }

    ListValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
