//! Tests for pattern validation.

use super::validate::*;

mod single_pattern {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        assert!(!validate_pattern(""));
    }

    #[test]
    fn whitespace_only_is_invalid() {
        assert!(!validate_pattern("   \t"));
    }

    #[test]
    fn unbalanced_group_is_invalid() {
        assert!(!validate_pattern("("));
        assert!(!validate_pattern("(720p|1080p"));
    }

    #[test]
    fn unclosed_class_is_invalid() {
        assert!(!validate_pattern("[abc"));
    }

    #[test]
    fn dangling_repetition_is_invalid() {
        assert!(!validate_pattern("*abc"));
    }

    #[test]
    fn literal_is_valid() {
        assert!(validate_pattern("abc"));
    }

    #[test]
    fn alternation_with_wildcard_is_valid() {
        assert!(validate_pattern("(720p|1080p).*"));
    }

    #[test]
    fn inline_flags_are_valid() {
        assert!(validate_pattern("(?i)remux"));
    }

    #[test]
    fn look_around_is_rejected_by_dialect() {
        assert!(!validate_pattern("(?=.*1080p)"));
    }
}

mod pattern_list {
    use super::*;

    #[test]
    fn all_valid_list() {
        let result = validate_pattern_list(&["a", "b", "c"]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn empty_list_is_valid() {
        let result = validate_pattern_list::<String>(&[]);
        assert!(result.is_valid);
    }

    #[test]
    fn flags_later_duplicate_only() {
        let result = validate_pattern_list(&["a", "b", "a"]);

        assert!(!result.is_valid);
        assert_eq!(result.issue_at(0), None);
        assert_eq!(result.issue_at(1), None);
        assert_eq!(result.issue_at(2), Some(PatternIssue::Duplicate));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn duplicates_compare_trimmed_text() {
        let result = validate_pattern_list(&["1080p", "  1080p "]);
        assert_eq!(result.issue_at(1), Some(PatternIssue::Duplicate));
    }

    #[test]
    fn duplicates_are_case_sensitive() {
        let result = validate_pattern_list(&["remux", "REMUX"]);
        assert!(result.is_valid);
    }

    #[test]
    fn every_repeat_is_flagged() {
        let result = validate_pattern_list(&["x", "x", "x"]);
        assert_eq!(result.issue_at(0), None);
        assert_eq!(result.issue_at(1), Some(PatternIssue::Duplicate));
        assert_eq!(result.issue_at(2), Some(PatternIssue::Duplicate));
    }

    #[test]
    fn flags_empty_position() {
        let result = validate_pattern_list(&["a", " "]);
        assert_eq!(result.issue_at(1), Some(PatternIssue::Empty));
        assert!(!result.is_valid);
    }

    #[test]
    fn flags_invalid_syntax() {
        let result = validate_pattern_list(&["(", "ok"]);
        assert_eq!(result.issue_at(0), Some(PatternIssue::InvalidSyntax));
        assert_eq!(result.issue_at(1), None);
    }

    #[test]
    fn duplicate_overwrites_syntax_error() {
        let result = validate_pattern_list(&["(", "("]);
        assert_eq!(result.issue_at(0), Some(PatternIssue::InvalidSyntax));
        assert_eq!(result.issue_at(1), Some(PatternIssue::Duplicate));
    }

    #[test]
    fn second_blank_is_reported_as_duplicate() {
        let result = validate_pattern_list(&["", "  "]);
        assert_eq!(result.issue_at(0), Some(PatternIssue::Empty));
        assert_eq!(result.issue_at(1), Some(PatternIssue::Duplicate));
    }

    #[test]
    fn accepts_owned_strings() {
        let patterns = vec!["a".to_string(), "(".to_string()];
        let result = validate_pattern_list(&patterns);
        assert_eq!(result.issue_at(1), Some(PatternIssue::InvalidSyntax));
    }
}

mod issue {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(PatternIssue::Empty.to_string(), "Pattern cannot be empty");
        assert_eq!(PatternIssue::InvalidSyntax.to_string(), "Invalid regex syntax");
        assert_eq!(PatternIssue::Duplicate.to_string(), "Duplicate pattern");
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&PatternIssue::InvalidSyntax).unwrap();
        assert_eq!(json, r#""invalid_syntax""#);
    }
}
