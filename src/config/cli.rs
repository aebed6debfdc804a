//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Positions in the priority list are 1-based on the command line and
//! converted to 0-based indices during parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Settings editor for the `SeerrBridge` service.
///
/// Reads and writes the service's `.env` file, with a prioritized editor
/// for the torrent filter regex list and reusable filter presets.
#[derive(Debug, Parser)]
#[command(name = "seerr-settings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the service's .env file
    #[arg(long = "env-file", global = true)]
    pub env_file: Option<PathBuf>,

    /// Path to the preset file
    #[arg(long = "presets-file", global = true)]
    pub presets_file: Option<PathBuf>,

    /// Base URL of the service (enables reload)
    #[arg(long = "service-url", global = true)]
    pub service_url: Option<String>,

    /// HTTP headers for service requests in 'Key=Value' or 'Key: Value' format (repeatable)
    #[arg(long = "header", value_name = "K=V", global = true)]
    pub headers: Vec<String>,

    /// Bearer token for Authorization header
    #[arg(long, global = true)]
    pub bearer: Option<String>,

    /// Maximum number of reload attempts
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Initial reload retry delay in seconds
    #[arg(long = "retry-delay", global = true)]
    pub retry_delay: Option<u64>,

    /// URL probe timeout in seconds
    #[arg(long = "probe-timeout", global = true)]
    pub probe_timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for seerr-settings
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "seerr-settings.toml")]
        output: PathBuf,
    },

    /// Print every variable and the filter list
    Show,

    /// Edit the torrent filter priority list
    Filter {
        /// Filter operation
        #[command(subcommand)]
        action: FilterCommand,
    },

    /// Set a variable
    Set {
        /// Variable name
        key: String,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Remove a variable
    Unset {
        /// Variable name
        key: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Manage filter presets
    Preset {
        /// Preset operation
        #[command(subcommand)]
        action: PresetCommand,
    },

    /// Report configuration problems; with KEY, probe that variable as a URL
    Check {
        /// Variable holding a URL to probe
        key: Option<String>,
    },

    /// Ask the service to reload its settings
    Reload,

    /// Re-read the env file periodically and report changes
    Watch {
        /// Seconds between refreshes
        #[arg(long)]
        interval: Option<u64>,
    },
}

/// Options shared by every command that writes the env file.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SaveArgs {
    /// Save even if the result has diagnostics
    #[arg(long)]
    pub force: bool,

    /// Ask the service to reload after saving
    #[arg(long)]
    pub reload: bool,
}

/// Priority list operations
#[derive(Debug, Subcommand)]
pub enum FilterCommand {
    /// Show the list with positions, diagnostics and matching presets
    List,

    /// Append a pattern at the lowest priority
    Add {
        /// Regular expression
        pattern: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Replace the pattern at a position
    Set {
        /// 1-based position
        #[arg(value_parser = parse_position)]
        position: usize,
        /// Regular expression
        pattern: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Remove the pattern at a position
    Remove {
        /// 1-based position
        #[arg(value_parser = parse_position)]
        position: usize,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Raise the priority of a pattern
    Up {
        /// 1-based position
        #[arg(value_parser = parse_position)]
        position: usize,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Lower the priority of a pattern
    Down {
        /// 1-based position
        #[arg(value_parser = parse_position)]
        position: usize,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Replace the list with a preset's pattern, or overwrite one position with --at
    ApplyPreset {
        /// Preset name or id
        preset: String,
        /// 1-based position to overwrite
        #[arg(long, value_parser = parse_position)]
        at: Option<usize>,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Insert a preset's pattern right after a position
    InsertPreset {
        /// 1-based position to insert after
        #[arg(value_parser = parse_position)]
        after: usize,
        /// Preset name or id
        preset: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Replace the list with the default patterns
    Reset {
        #[command(flatten)]
        save: SaveArgs,
    },
}

/// Preset operations
#[derive(Debug, Subcommand)]
pub enum PresetCommand {
    /// List presets
    List,

    /// Add or replace a custom preset
    Add {
        /// Display name
        name: String,
        /// Regular expression
        pattern: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Explicit id (replaces the preset with this id)
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete a custom preset by name or id
    Remove {
        /// Preset name or id
        preset: String,
    },
}

/// Parses a 1-based position into a 0-based index.
fn parse_position(s: &str) -> Result<usize, String> {
    let position: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a position (1, 2, 3, ...)"))?;
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".to_string())
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning errors instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns the `--interval` given to `watch`, if any.
    #[must_use]
    pub const fn watch_interval(&self) -> Option<u64> {
        match self.command {
            Command::Watch { interval } => interval,
            _ => None,
        }
    }
}
