//! Tests for CLI argument parsing.

use super::cli::{Cli, Command, FilterCommand, PresetCommand, SaveArgs};

fn parse(args: &[&str]) -> Cli {
    let mut full_args = vec!["seerr-settings"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

fn filter_action(args: &[&str]) -> FilterCommand {
    match parse(args).command {
        Command::Filter { action } => action,
        other => panic!("expected filter command, got {other:?}"),
    }
}

mod global_options {
    use super::*;

    #[test]
    fn parse_paths_and_service() {
        let cli = parse(&[
            "--env-file",
            "/srv/.env",
            "--presets-file",
            "p.json",
            "--service-url",
            "http://localhost:8777",
            "show",
        ]);

        assert_eq!(cli.env_file.unwrap().to_str(), Some("/srv/.env"));
        assert_eq!(cli.presets_file.unwrap().to_str(), Some("p.json"));
        assert_eq!(cli.service_url.as_deref(), Some("http://localhost:8777"));
        assert!(matches!(cli.command, Command::Show));
    }

    #[test]
    fn global_options_accepted_after_subcommand() {
        let cli = parse(&["reload", "--header", "X-Key=1", "--bearer", "t", "-v"]);

        assert_eq!(cli.headers, vec!["X-Key=1"]);
        assert_eq!(cli.bearer.as_deref(), Some("t"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_retry_and_probe_options() {
        let cli = parse(&[
            "--retry-max",
            "5",
            "--retry-delay",
            "1",
            "--probe-timeout",
            "9",
            "check",
        ]);

        assert_eq!(cli.retry_max, Some(5));
        assert_eq!(cli.retry_delay, Some(1));
        assert_eq!(cli.probe_timeout, Some(9));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from_iter(["seerr-settings"]).is_err());
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn init_has_default_output() {
        let cli = parse(&["init"]);
        assert!(cli.is_init());
        match cli.command {
            Command::Init { output } => assert_eq!(output.to_str(), Some("seerr-settings.toml")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn set_accepts_hyphen_values_and_save_flags() {
        let cli = parse(&["set", "REFRESH_INTERVAL_MINUTES", "-5", "--force", "--reload"]);

        match cli.command {
            Command::Set { key, value, save } => {
                assert_eq!(key, "REFRESH_INTERVAL_MINUTES");
                assert_eq!(value, "-5");
                assert!(save.force);
                assert!(save.reload);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn check_key_is_optional() {
        assert!(matches!(parse(&["check"]).command, Command::Check { key: None }));
        assert!(matches!(
            parse(&["check", "OVERSEERR_BASE"]).command,
            Command::Check { key: Some(ref k) } if k == "OVERSEERR_BASE"
        ));
    }

    #[test]
    fn watch_interval() {
        let cli = parse(&["watch", "--interval", "10"]);
        assert_eq!(cli.watch_interval(), Some(10));
        assert_eq!(parse(&["show"]).watch_interval(), None);
    }

    #[test]
    fn preset_add_with_description() {
        match parse(&["preset", "add", "HEVC", "(?i)x265", "--description", "small"]).command {
            Command::Preset {
                action:
                    PresetCommand::Add {
                        name,
                        pattern,
                        description,
                        id,
                    },
            } => {
                assert_eq!(name, "HEVC");
                assert_eq!(pattern, "(?i)x265");
                assert_eq!(description.as_deref(), Some("small"));
                assert!(id.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

mod filter_positions {
    use super::*;

    #[test]
    fn positions_are_converted_to_indices() {
        assert!(matches!(
            filter_action(&["filter", "remove", "1"]),
            FilterCommand::Remove { position: 0, .. }
        ));
        assert!(matches!(
            filter_action(&["filter", "up", "3"]),
            FilterCommand::Up { position: 2, .. }
        ));
    }

    #[test]
    fn zero_position_is_rejected() {
        assert!(Cli::try_parse_from_iter(["seerr-settings", "filter", "down", "0"]).is_err());
        assert!(Cli::try_parse_from_iter(["seerr-settings", "filter", "down", "x"]).is_err());
    }

    #[test]
    fn apply_preset_at_position() {
        match filter_action(&["filter", "apply-preset", "1080p", "--at", "2"]) {
            FilterCommand::ApplyPreset { preset, at, save } => {
                assert_eq!(preset, "1080p");
                assert_eq!(at, Some(1));
                assert!(!save.force);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn insert_preset_after_position() {
        assert!(matches!(
            filter_action(&["filter", "insert-preset", "1", "4K / UHD"]),
            FilterCommand::InsertPreset { after: 0, ref preset, .. } if preset == "4K / UHD"
        ));
    }

    #[test]
    fn set_pattern_at_position() {
        assert!(matches!(
            filter_action(&["filter", "set", "2", "(?i)720p"]),
            FilterCommand::Set { position: 1, ref pattern, .. } if pattern == "(?i)720p"
        ));
    }

    #[test]
    fn list_add_and_reset() {
        assert!(matches!(filter_action(&["filter", "list"]), FilterCommand::List));
        assert!(matches!(
            filter_action(&["filter", "add", "x264"]),
            FilterCommand::Add { ref pattern, .. } if pattern == "x264"
        ));
        assert!(matches!(
            filter_action(&["filter", "reset", "--force"]),
            FilterCommand::Reset {
                save: SaveArgs {
                    force: true,
                    reload: false
                }
            }
        ));
    }
}
