use std::path::PathBuf;

use thiserror::Error;

/// Why the settings for this run could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `init` could not write the template.
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `init` never overwrites.
    #[error("Config file '{}' already exists", path.display())]
    FileExists { path: PathBuf },

    /// Optional in general, needed by the command being run.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        field: &'static str,
        hint: &'static str,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A duration or path under `field` that cannot be used.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("Invalid retry configuration: {0}")]
    InvalidRetry(String),

    /// `header` is the text as given, `Key=Value` or a TOML entry.
    #[error("Invalid header '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },
}

/// Dotted names used in messages, matching the TOML layout.
pub mod field {
    pub const SERVICE_URL: &str = "service.url";
    pub const ENV_FILE: &str = "env.file";
    pub const PRESETS_FILE: &str = "presets.file";
    pub const PROBE_TIMEOUT: &str = "probe.timeout";
    pub const WATCH_INTERVAL: &str = "watch.interval";
}

impl ConfigError {
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
