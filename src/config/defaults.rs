//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default env file path, relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Directory under the platform config dir holding the preset file.
pub const APP_DIR: &str = "seerr-settings";

/// File name of the preset file.
pub const PRESETS_FILENAME: &str = "presets.json";

/// Default maximum number of reload attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: u64 = 2;

/// Default maximum retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default URL probe timeout in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Default watch refresh interval in seconds.
pub const WATCH_INTERVAL_SECS: u64 = 30;

/// Default preset file path.
///
/// Falls back to the working directory when the platform has no config dir.
#[must_use]
pub fn presets_file() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(PRESETS_FILENAME);
    path
}

/// Default probe timeout as Duration.
#[must_use]
pub const fn probe_timeout() -> Duration {
    Duration::from_secs(PROBE_TIMEOUT_SECS)
}

/// Default watch interval as Duration.
#[must_use]
pub const fn watch_interval() -> Duration {
    Duration::from_secs(WATCH_INTERVAL_SECS)
}
