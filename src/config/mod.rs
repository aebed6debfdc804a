//! Where each setting comes from.
//!
//! A value given on the command line beats one from the TOML file
//! (`--config`), which beats the built-in default in [`defaults`].
//! [`ValidatedConfig`] is the merged result, checked once at startup.
//!
//! Headers merge by name: `[service.headers]` first, then `--header`
//! entries, then the bearer token as `Authorization`.
//!
//! `service.url` has no default. Without it only `reload` is unavailable.
//! `retry.max_delay` and `retry.multiplier` can only be set in TOML.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command, FilterCommand, PresetCommand, SaveArgs};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
