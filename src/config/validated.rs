//! Merging and checking of the configuration sources.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use url::Url;

use crate::service::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Settings for one run, every value already checked.
#[derive(Debug)]
pub struct ValidatedConfig {
    pub env_file: PathBuf,
    pub presets_file: PathBuf,
    /// `None` disables reload.
    pub service_url: Option<Url>,
    /// Sent with reload requests, `Authorization` included.
    pub headers: HeaderMap,
    pub retry_policy: RetryPolicy,
    pub probe_timeout: Duration,
    pub watch_interval: Duration,
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let service_str = self
            .service_url
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);

        write!(
            f,
            "Config {{ env_file: {}, presets_file: {}, service_url: {}, headers: {}, \
             retry: {}x/{}s, probe_timeout: {}s, watch_interval: {}s }}",
            self.env_file.display(),
            self.presets_file.display(),
            service_str,
            self.headers.len(),
            self.retry_policy.max_attempts,
            self.retry_policy.initial_delay.as_secs(),
            self.probe_timeout.as_secs(),
            self.watch_interval.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Merges `cli` over `toml` over the defaults.
    ///
    /// # Errors
    ///
    /// Fails on a malformed or non-HTTP service URL, a zero duration, an
    /// inconsistent retry section or a header that cannot be sent.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let env_file = Self::resolve_env_file(cli, toml)?;
        let presets_file = Self::resolve_presets_file(cli, toml)?;
        let service_url = Self::resolve_service_url(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        let probe_timeout = resolve_seconds(
            field::PROBE_TIMEOUT,
            cli.probe_timeout,
            toml.and_then(|t| t.probe.timeout),
            defaults::PROBE_TIMEOUT_SECS,
        )?;

        let watch_interval = resolve_seconds(
            field::WATCH_INTERVAL,
            cli.watch_interval(),
            toml.and_then(|t| t.watch.interval),
            defaults::WATCH_INTERVAL_SECS,
        )?;

        Ok(Self {
            env_file,
            presets_file,
            service_url,
            headers,
            retry_policy,
            probe_timeout,
            watch_interval,
            verbose: cli.verbose,
        })
    }

    /// Reads `--config` when given, then merges as [`Self::from_raw`].
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or the merged values
    /// are invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = cli.config.as_deref().map(TomlConfig::load).transpose()?;

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the service URL, or an error naming how to set it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no URL is configured.
    pub fn require_service_url(&self) -> Result<&Url, ConfigError> {
        self.service_url.as_ref().ok_or_else(|| {
            ConfigError::missing(
                field::SERVICE_URL,
                "Use --service-url or set service.url in config file",
            )
        })
    }

    fn resolve_env_file(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = cli.env_file {
            return Ok(path.clone());
        }

        toml.and_then(|t| t.env.file.as_deref())
            .map_or_else(
                || Ok(PathBuf::from(defaults::ENV_FILE)),
                |p| expand_path(field::ENV_FILE, p),
            )
    }

    fn resolve_presets_file(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = cli.presets_file {
            return Ok(path.clone());
        }

        toml.and_then(|t| t.presets.file.as_deref())
            .map_or_else(
                || Ok(defaults::presets_file()),
                |p| expand_path(field::PRESETS_FILE, p),
            )
    }

    fn resolve_service_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Url>, ConfigError> {
        let Some(url_str) = cli
            .service_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.service.url.as_deref()))
        else {
            return Ok(None);
        };

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Some(url))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let from_toml = toml
            .into_iter()
            .flat_map(|t| &t.service.headers)
            .map(|(name, value)| header(name, value, &format!("{name} = {value:?}")));
        let from_cli = cli.headers.iter().map(|raw| {
            let (name, value) = split_header(raw)?;
            header(name, value, raw)
        });

        // CLI entries come last and win
        let mut headers = HeaderMap::new();
        for entry in from_toml.chain(from_cli) {
            let (name, value) = entry?;
            headers.insert(name, value);
        }

        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.service.bearer.as_deref()));
        if let Some(token) = bearer {
            let (_, value) = header("Authorization", &format!("Bearer {token}"), "--bearer")?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let initial_delay_secs = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.initial_delay))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);

        let max_delay_secs = retry
            .and_then(|r| r.max_delay)
            .unwrap_or(defaults::RETRY_MAX_DELAY_SECS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_secs < initial_delay_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay ({max_delay_secs}s) must be >= initial_delay ({initial_delay_secs}s)"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_secs(initial_delay_secs))
            .with_max_delay(Duration::from_secs(max_delay_secs))
            .with_multiplier(multiplier))
    }
}

/// Writes the default configuration template to a new file.
///
/// # Errors
///
/// Returns [`ConfigError::FileExists`] if `path` already exists, or
/// [`ConfigError::FileWrite`] if it cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    use std::io::Write;

    let template = super::toml::default_config_template();
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                ConfigError::FileExists {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::FileWrite {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

    file.write_all(template.as_bytes())
        .map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

fn resolve_seconds(
    field: &'static str,
    cli: Option<u64>,
    toml: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = cli.or(toml).unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

/// Expands a leading `~` to the home directory.
fn expand_path(field: &'static str, raw: &str) -> Result<PathBuf, ConfigError> {
    let Some(rest) = raw.strip_prefix('~') else {
        return Ok(PathBuf::from(raw));
    };

    if !rest.is_empty() && !rest.starts_with(['/', '\\']) {
        // `~user` is not supported
        return Ok(PathBuf::from(raw));
    }

    let home = dirs::home_dir().ok_or_else(|| ConfigError::InvalidValue {
        field,
        reason: "cannot expand '~': no home directory".to_string(),
    })?;

    Ok(home.join(rest.trim_start_matches(['/', '\\'])))
}

/// Splits `Key=Value`, or `Key: Value` when there is no `=`.
fn split_header(raw: &str) -> Result<(&str, &str), ConfigError> {
    raw.split_once('=')
        .or_else(|| raw.split_once(':'))
        .map(|(name, value)| (name.trim(), value.trim()))
        .ok_or_else(|| ConfigError::InvalidHeader {
            header: raw.to_string(),
            reason: "expected 'Key=Value' or 'Key: Value'".to_string(),
        })
}

fn header(name: &str, value: &str, raw: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidHeader {
        header: raw.to_string(),
        reason,
    };
    let name = name.parse::<HeaderName>().map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((name, value))
}
