//! `seerr-settings` command line entry point.

use seerr_settings::config::{Cli, Command, ConfigError, ValidatedConfig};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};
use run::RunError;

#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // init must work before any config file exists
    if let Command::Init { output } = &cli.command {
        return handle_init(output);
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => return report_config_error(&e),
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(cli.command, config)
}

fn handle_init(output: &std::path::Path) -> ExitCode {
    match run::init(output, &mut std::io::stdout()) {
        Ok(()) => exit_code::SUCCESS,
        Err(RunError::Config(e)) => report_config_error(&e),
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

fn report_config_error(error: &ConfigError) -> ExitCode {
    eprintln!("Configuration error: {error}");
    print_config_hint(error);
    exit_code::CONFIG_ERROR
}

/// Drives `command` on a fresh runtime and maps the outcome to an exit
/// status.
#[cfg(not(tarpaulin_include))]
fn run_application(command: Command, config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(command, config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(RunError::Config(e)) => {
            tracing::error!("{e}");
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            tracing::error!("{e}");
            exit_code::runtime_error()
        }
    }
}
