//! Process-level glue for `main`: exit statuses, logging, error hints.

use seerr_settings::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    use std::process::ExitCode;

    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Bad arguments or an unusable config file.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// A command ran and failed: refused save, failed check, reload error.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Follows a configuration error with what the user can do about it.
pub fn print_config_hint(error: &ConfigError) {
    let hint = match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::SERVICE_URL => {
            "Pass --service-url, or run 'seerr-settings init' and set service.url."
        }
        ConfigError::FileRead { .. } => {
            "Run 'seerr-settings init' to generate a configuration template."
        }
        ConfigError::FileExists { .. } => "Use --output to write the template somewhere else.",
        _ => return,
    };
    eprintln!("\n{hint}");
}

/// Logs to stderr so stdout carries only command output. `RUST_LOG`
/// overrides the level picked by `verbose`.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
