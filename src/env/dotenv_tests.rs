//! Tests for `.env` parsing and rendering.

use super::EnvVars;
use super::dotenv::{Line, format_assignment, parse_document, parse_line, render, vars_from};

fn value_of(line: &str) -> Option<String> {
    match parse_line(line) {
        Line::Assignment { value, .. } => Some(value),
        Line::Other(_) => None,
    }
}

fn round_trip(value: &str) -> String {
    value_of(&format_assignment("KEY", value)).unwrap()
}

mod parse {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_kept_as_other() {
        assert_eq!(parse_line("# comment"), Line::Other("# comment".to_string()));
        assert_eq!(parse_line("   "), Line::Other("   ".to_string()));
        assert_eq!(parse_line("no equals sign"), Line::Other("no equals sign".to_string()));
    }

    #[test]
    fn bare_value_is_trimmed() {
        assert_eq!(value_of("KEY=  value  ").as_deref(), Some("value"));
    }

    #[test]
    fn splits_at_first_equals() {
        assert_eq!(value_of("URL=http://x/?a=b").as_deref(), Some("http://x/?a=b"));
    }

    #[test]
    fn export_prefix_is_ignored() {
        match parse_line("export KEY=1") {
            Line::Assignment { key, value, .. } => {
                assert_eq!(key, "KEY");
                assert_eq!(value, "1");
            }
            Line::Other(_) => panic!("expected assignment"),
        }
    }

    #[test]
    fn inline_comment_stripped_from_bare_value() {
        assert_eq!(value_of("KEY=value # note").as_deref(), Some("value"));
    }

    #[test]
    fn hash_without_preceding_space_is_kept() {
        assert_eq!(value_of("KEY=a#b").as_deref(), Some("a#b"));
    }

    #[test]
    fn single_quotes_only_unescape_backslash_and_quote() {
        assert_eq!(value_of(r"KEY='a \n # b'").as_deref(), Some(r"a \n # b"));
        assert_eq!(value_of(r"KEY='\\d it\'s'").as_deref(), Some(r"\d it's"));
        assert_eq!(value_of(r"KEY='\d'").as_deref(), Some(r"\d"));
    }

    #[test]
    fn double_quotes_unescape_control_characters() {
        assert_eq!(value_of(r#"KEY="a\tb\bc""#).as_deref(), Some("a\tb\u{8}c"));
    }

    #[test]
    fn double_quotes_unescape() {
        assert_eq!(
            value_of(r#"KEY="say \"hi\"\nback\\slash""#).as_deref(),
            Some("say \"hi\"\nback\\slash")
        );
    }

    #[test]
    fn unknown_escapes_are_kept() {
        assert_eq!(value_of(r#"KEY="\d+""#).as_deref(), Some(r"\d+"));
    }

    #[test]
    fn unterminated_quote_keeps_raw_text() {
        assert_eq!(value_of("KEY='open").as_deref(), Some("'open"));
    }

    #[test]
    fn invalid_key_is_not_an_assignment() {
        assert!(value_of("1KEY=x").is_none());
        assert!(value_of("=x").is_none());
    }

    #[test]
    fn later_duplicate_wins() {
        let vars = vars_from(&parse_document("A=1\nA=2\n"));
        assert_eq!(vars.get("A"), Some("2"));
        assert_eq!(vars.len(), 1);
    }
}

mod expansion {
    use super::*;

    fn vars(content: &str) -> EnvVars {
        vars_from(&parse_document(content))
    }

    #[test]
    fn refers_to_earlier_assignment() {
        let vars = vars("HOST=example.org\nURL=http://${HOST}:5055\nQUOTED=\"${HOST}/x\"\n");
        assert_eq!(vars.get("URL"), Some("http://example.org:5055"));
        assert_eq!(vars.get("QUOTED"), Some("example.org/x"));
    }

    #[test]
    fn single_quoted_is_left_alone() {
        let vars = vars("HOST=example.org\nRAW='${HOST}'\n");
        assert_eq!(vars.get("RAW"), Some("${HOST}"));
    }

    #[test]
    fn default_and_missing_names() {
        let vars = vars(
            "A=${SEERR_SETTINGS_UNSET_VAR:-fallback}\nB=x${SEERR_SETTINGS_UNSET_VAR}y\n",
        );
        assert_eq!(vars.get("A"), Some("fallback"));
        assert_eq!(vars.get("B"), Some("xy"));
    }

    #[test]
    fn plain_dollar_is_kept() {
        assert_eq!(value_of("KEY=1080p$").as_deref(), Some("1080p$"));
    }
}

mod quoting {
    use super::*;

    #[test]
    fn plain_values_stay_bare() {
        assert_eq!(format_assignment("KEY", "abc"), "KEY=abc");
        assert_eq!(format_assignment("KEY", ""), "KEY=");
    }

    #[test]
    fn json_array_is_single_quoted() {
        let value = r#"["(?i)2160p","1080p"]"#;
        assert_eq!(format_assignment("KEY", value), format!("KEY='{value}'"));
        assert_eq!(round_trip(value), value);
    }

    #[test]
    fn single_quote_and_backslash_are_escaped() {
        let value = r#"it's "quoted" \ here"#;
        assert_eq!(
            format_assignment("KEY", value),
            r#"KEY='it\'s "quoted" \\ here'"#
        );
        assert_eq!(round_trip(value), value);
    }

    #[test]
    fn newline_uses_double_quotes() {
        assert_eq!(format_assignment("KEY", "a\n\"b\""), r#"KEY="a\n\"b\"""#);
        assert_eq!(round_trip("a\nb"), "a\nb");
    }

    #[test]
    fn backslashes_are_doubled() {
        assert_eq!(format_assignment("KEY", r"\d{3,4}p"), r"KEY='\\d{3,4}p'");
        assert_eq!(round_trip(r"\d{3,4}p"), r"\d{3,4}p");
    }

    #[test]
    fn dollar_brace_is_not_expanded_after_write() {
        assert_eq!(round_trip("${HOME}"), "${HOME}");
    }
}

mod render_document {
    use super::*;

    const DOC: &str = "# Settings\nA=1\n\n# filter\nB='x y'\nC=3\n";

    #[test]
    fn unchanged_mapping_reproduces_document() {
        let lines = parse_document(DOC);
        let vars = vars_from(&lines);
        assert_eq!(render(&lines, &vars), DOC);
    }

    #[test]
    fn changed_value_keeps_its_line() {
        let lines = parse_document(DOC);
        let mut vars = vars_from(&lines);
        vars.set("A", "2");

        assert_eq!(render(&lines, &vars), "# Settings\nA=2\n\n# filter\nB='x y'\nC=3\n");
    }

    #[test]
    fn removed_key_is_dropped_and_new_key_appended() {
        let lines = parse_document(DOC);
        let mut vars = vars_from(&lines);
        vars.remove("C");
        vars.set("D", "4");

        assert_eq!(render(&lines, &vars), "# Settings\nA=1\n\n# filter\nB='x y'\nD=4\n");
    }

    #[test]
    fn duplicate_lines_collapse_to_first_position() {
        let lines = parse_document("A=1\nB=2\nA=3\n");
        let vars = vars_from(&lines);

        assert_eq!(render(&lines, &vars), "A=3\nB=2\n");
    }

    #[test]
    fn empty_document_lists_vars_in_order() {
        let vars: EnvVars = [("Z", "1"), ("A", "2")].into_iter().collect();
        assert_eq!(render(&[], &vars), "Z=1\nA=2\n");
    }
}
