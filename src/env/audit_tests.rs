//! Tests for the settings audit and change detection.

use super::{EnvChange, EnvIssue, EnvVars, audit, diff, keys};
use crate::filter::PatternIssue;

fn complete() -> EnvVars {
    [
        (keys::OVERSEERR_BASE, "http://localhost:5055"),
        (keys::OVERSEERR_API_KEY, "abc"),
        (keys::TRAKT_API_KEY, "def"),
    ]
    .into_iter()
    .collect()
}

fn with(key: &str, value: &str) -> EnvVars {
    let mut vars = complete();
    vars.set(key, value);
    vars
}

mod audit_vars {
    use super::*;

    #[test]
    fn complete_settings_have_no_issues() {
        assert!(audit(&complete()).is_empty());
    }

    #[test]
    fn missing_and_blank_required_keys_reported() {
        let mut vars = complete();
        vars.remove(keys::TRAKT_API_KEY);
        vars.set(keys::OVERSEERR_API_KEY, "  ");

        let issues = audit(&vars);

        assert_eq!(
            issues,
            vec![
                EnvIssue::MissingRequired(keys::OVERSEERR_API_KEY),
                EnvIssue::MissingRequired(keys::TRAKT_API_KEY),
            ]
        );
    }

    #[test]
    fn boolean_keys_accept_any_case() {
        assert!(audit(&with(keys::HEADLESS_MODE, "True")).is_empty());
        assert!(audit(&with(keys::HEADLESS_MODE, "false")).is_empty());
    }

    #[test]
    fn boolean_keys_reject_other_values() {
        let issues = audit(&with(keys::ENABLE_SHOW_SUBSCRIPTION_TASK, "yes"));
        assert_eq!(
            issues,
            vec![EnvIssue::InvalidBoolean {
                key: keys::ENABLE_SHOW_SUBSCRIPTION_TASK,
                value: "yes".to_string(),
            }]
        );
    }

    #[test]
    fn refresh_interval_must_be_numeric() {
        let issues = audit(&with(keys::REFRESH_INTERVAL_MINUTES, "soon"));
        assert_eq!(issues, vec![EnvIssue::InvalidInterval("soon".to_string())]);
    }

    #[test]
    fn refresh_interval_below_minimum() {
        let issues = audit(&with(keys::REFRESH_INTERVAL_MINUTES, "0.5"));
        assert_eq!(issues, vec![EnvIssue::IntervalTooShort(0.5)]);
        assert!(audit(&with(keys::REFRESH_INTERVAL_MINUTES, "1")).is_empty());
    }

    #[test]
    fn unparseable_filter_reported() {
        let issues = audit(&with(keys::TORRENT_FILTER_REGEX, "[1,2]"));
        assert_eq!(
            issues,
            vec![EnvIssue::InvalidFilter(
                "Array contains non-string values".to_string()
            )]
        );
    }

    #[test]
    fn uncompilable_single_pattern_reported() {
        let issues = audit(&with(keys::TORRENT_FILTER_REGEX, "(unclosed"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key(), keys::TORRENT_FILTER_REGEX);
    }

    #[test]
    fn bad_patterns_in_array_reported_by_position() {
        let issues = audit(&with(keys::TORRENT_FILTER_REGEX, r#"["a","(","a",""]"#));
        assert_eq!(
            issues,
            vec![
                EnvIssue::InvalidPattern {
                    index: 1,
                    issue: PatternIssue::InvalidSyntax,
                },
                EnvIssue::InvalidPattern {
                    index: 2,
                    issue: PatternIssue::Duplicate,
                },
                EnvIssue::InvalidPattern {
                    index: 3,
                    issue: PatternIssue::Empty,
                },
            ]
        );
    }

    #[test]
    fn display_uses_one_based_positions() {
        let issue = EnvIssue::InvalidPattern {
            index: 0,
            issue: PatternIssue::Empty,
        };
        assert_eq!(
            issue.to_string(),
            "TORRENT_FILTER_REGEX pattern 1: Pattern cannot be empty"
        );
    }
}

mod changes {
    use super::*;

    #[test]
    fn identical_mappings_have_no_changes() {
        assert!(diff(&complete(), &complete()).is_empty());
    }

    #[test]
    fn reports_changed_removed_then_added() {
        let old: EnvVars = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();
        let new: EnvVars = [("D", "4"), ("A", "1"), ("B", "20")].into_iter().collect();

        let changes = diff(&old, &new);

        assert_eq!(
            changes,
            vec![
                EnvChange {
                    key: "B".to_string(),
                    old: Some("2".to_string()),
                    new: Some("20".to_string()),
                },
                EnvChange {
                    key: "C".to_string(),
                    old: Some("3".to_string()),
                    new: None,
                },
                EnvChange {
                    key: "D".to_string(),
                    old: None,
                    new: Some("4".to_string()),
                },
            ]
        );
        assert!(changes[1].is_removed());
        assert!(changes[2].is_added());
    }
}
