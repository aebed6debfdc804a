//! Torrent filter regex value model.
//!
//! The downstream service reads a single variable, `TORRENT_FILTER_REGEX`,
//! that holds either one regular expression or a JSON array of regular
//! expressions ordered by priority. This module provides pure functions for:
//! - Detecting which encoding a stored value uses ([`detect_format`])
//! - Parsing it into a structured view ([`parse`], [`ParsedRegexValue`])
//! - Validating single patterns and whole priority lists
//!   ([`validate_pattern`], [`validate_pattern_list`])
//! - Serializing a priority list back to its storage form ([`serialize`])
//! - Matching patterns against named presets ([`find_preset_for_pattern`],
//!   [`match_sequence_to_preset_name`])
//!
//! # Storage Forms
//!
//! | Stored text            | Format                  | Patterns        |
//! |------------------------|-------------------------|-----------------|
//! | `""`                   | [`RegexFormat::Empty`]  | `[]`            |
//! | `(720p\|1080p).*`      | [`RegexFormat::Single`] | `["(720p\|1080p).*"]` |
//! | `["a","b"]`            | [`RegexFormat::Array`]  | `["a", "b"]`    |
//!
//! Serialization collapses a one-element list to the bare string and an
//! empty list to the empty string, so `parse(serialize(p))` reproduces `p`
//! for every list of two or more patterns.
//!
//! Nothing here evaluates patterns against content; they are only compiled
//! to check syntax.

mod format;
mod lookup;
mod validate;

#[cfg(test)]
mod validate_tests;

pub use format::{ParsedRegexValue, RegexFormat, default_patterns, detect_format, parse, serialize};
pub use lookup::{find_preset_for_pattern, match_sequence_to_preset_name};
pub use validate::{ListValidation, PatternIssue, validate_pattern, validate_pattern_list};
