//! URL reachability checks.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use super::{HttpClient, HttpError, HttpRequest};

/// Result of probing a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered. Any status counts.
    Reachable {
        /// Status the server answered with
        status: http::StatusCode,
        /// Time until the answer arrived
        elapsed: Duration,
    },

    /// No answer: connection failure or timeout.
    Unreachable {
        /// What went wrong
        reason: String,
        /// Time until the failure
        elapsed: Duration,
    },

    /// The text is not a usable URL; nothing was sent.
    Invalid {
        /// Parse error
        reason: String,
    },
}

impl ProbeOutcome {
    /// Returns true if the server answered.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable { status, elapsed } => {
                write!(f, "reachable ({status}) in {}ms", elapsed.as_millis())
            }
            Self::Unreachable { reason, elapsed } => {
                write!(f, "unreachable after {}ms: {reason}", elapsed.as_millis())
            }
            Self::Invalid { reason } => write!(f, "invalid URL: {reason}"),
        }
    }
}

/// Sends a GET to a URL to see whether anything answers.
#[derive(Debug)]
pub struct UrlProbe<H> {
    client: H,
    timeout: Duration,
}

impl<H> UrlProbe<H> {
    /// Default time to wait for an answer.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a probe using [`Self::DEFAULT_TIMEOUT`].
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self {
            client,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets how long to wait for an answer.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<H: HttpClient> UrlProbe<H> {
    /// Probes `url`.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let url = match url::Url::parse(url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                return ProbeOutcome::Invalid {
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                };
            }
            Err(e) => {
                return ProbeOutcome::Invalid {
                    reason: e.to_string(),
                };
            }
        };

        let request = HttpRequest::get(url).with_timeout(self.timeout);
        let started = Instant::now();
        let result = self.client.request(request).await;
        let elapsed = started.elapsed();

        match result {
            Ok(response) => ProbeOutcome::Reachable {
                status: response.status,
                elapsed,
            },
            Err(HttpError::InvalidUrl(reason)) => ProbeOutcome::Invalid { reason },
            Err(e) => ProbeOutcome::Unreachable {
                reason: e.to_string(),
                elapsed,
            },
        }
    }
}
