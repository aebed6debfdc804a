//! Shape of the `--config` file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Every key is optional. Unknown sections or keys are an error so typos
/// surface at startup.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub env: EnvSection,
    #[serde(default)]
    pub presets: PresetsSection,
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[env]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvSection {
    /// The service's `.env` file. A leading `~` is expanded.
    pub file: Option<String>,
}

/// `[presets]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetsSection {
    pub file: Option<String>,
}

/// `[service]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    /// Base URL; the reload endpoint is resolved against it.
    pub url: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub bearer: Option<String>,
}

/// `[retry]`, delays in whole seconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub initial_delay: Option<u64>,
    pub max_delay: Option<u64>,
    pub multiplier: Option<f64>,
}

/// `[probe]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Seconds to wait for an answer.
    pub timeout: Option<u64>,
}

/// `[watch]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Seconds between re-reads of the env file.
    pub interval: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# seerr-settings configuration file

[env]
# Path to the service's .env file (default: .env)
# file = "/opt/seerrbridge/.env"

[presets]
# Path to the preset file
# (default: <config dir>/seerr-settings/presets.json, ~ is expanded)
# file = "~/.config/seerr-settings/presets.json"

[service]
# Base URL of the running service; enables `reload` and `--reload`
# url = "http://localhost:8777"

# HTTP headers sent with reload requests
# [service.headers]
# X-Api-Key = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

[retry]
# Maximum number of reload attempts (default: 3)
# max_attempts = 3

# Initial retry delay in seconds (default: 2)
# initial_delay = 2

# Maximum retry delay in seconds (default: 30)
# max_delay = 30

# Backoff multiplier (default: 2.0)
# multiplier = 2.0

[probe]
# Seconds to wait for a URL to answer (default: 5)
# timeout = 5

[watch]
# Seconds between env file refreshes in watch mode (default: 30)
interval = 30
"#
    .to_string()
}
