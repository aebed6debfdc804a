//! Asking the service to re-read its `.env` file.

use serde::Deserialize;

use crate::time::{Sleeper, TokioSleeper};

use super::{AttemptError, HttpClient, HttpError, HttpRequest, ReloadError, RetryPolicy};

/// Path of the reload endpoint, relative to the service URL.
pub const RELOAD_PATH: &str = "reload-env";

/// What the service said about a reload.
///
/// Decoded leniently: missing fields are left empty, and a body that is
/// not JSON becomes the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReloadReport {
    /// Status word reported by the service, e.g. `success`.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable summary.
    #[serde(default)]
    pub message: Option<String>,
    /// Names of the variables the service saw change.
    #[serde(default)]
    pub changes: Vec<String>,
}

impl ReloadReport {
    /// Decodes a response body.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        if let Ok(report) = serde_json::from_slice::<Self>(body) {
            return report;
        }

        let text = String::from_utf8_lossy(body).trim().to_string();
        Self {
            message: (!text.is_empty()).then_some(text),
            ..Self::default()
        }
    }
}

/// Something that can make the service pick up new settings.
pub trait ReloadTrigger: Send + Sync {
    /// Requests a reload.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError`] if the service could not be told, after any
    /// retries the implementation performs.
    fn reload(&self) -> impl std::future::Future<Output = Result<ReloadReport, ReloadError>> + Send;
}

/// Reload trigger that POSTs to `{service_url}/reload-env`.
///
/// Connection failures, timeouts and transient statuses are retried with
/// exponential backoff per the [`RetryPolicy`]. Other client errors fail at
/// once.
///
/// # Example
///
/// ```
/// use seerr_settings::service::{HttpReloadTrigger, ReqwestClient};
/// use url::Url;
///
/// let base = Url::parse("http://localhost:8777/bridge").unwrap();
/// let trigger = HttpReloadTrigger::new(ReqwestClient::new(), &base).unwrap();
/// assert_eq!(trigger.endpoint().as_str(), "http://localhost:8777/bridge/reload-env");
/// ```
#[derive(Debug)]
pub struct HttpReloadTrigger<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    endpoint: url::Url,
    headers: http::HeaderMap,
    retry_policy: RetryPolicy,
}

impl<H> HttpReloadTrigger<H, TokioSleeper> {
    /// Creates a trigger for the service at `service_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the endpoint cannot be derived
    /// from `service_url`.
    pub fn new(client: H, service_url: &url::Url) -> Result<Self, HttpError> {
        Ok(Self {
            client,
            sleeper: TokioSleeper,
            endpoint: endpoint_for(service_url)?,
            headers: http::HeaderMap::new(),
            retry_policy: RetryPolicy::default(),
        })
    }
}

impl<H, S> HttpReloadTrigger<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> HttpReloadTrigger<H, S2> {
        HttpReloadTrigger {
            client: self.client,
            sleeper,
            endpoint: self.endpoint,
            headers: self.headers,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets headers sent with every request.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the reload endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

/// Appends [`RELOAD_PATH`] to the path of `base`.
fn endpoint_for(base: &url::Url) -> Result<url::Url, HttpError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(RELOAD_PATH)
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))
}

impl<H: HttpClient, S: Sleeper> HttpReloadTrigger<H, S> {
    async fn execute_request(&self) -> Result<ReloadReport, AttemptError> {
        let request = HttpRequest::post(self.endpoint.clone()).with_headers(&self.headers);
        let response = self.client.request(request).await?;

        if response.is_success() {
            return Ok(ReloadReport::from_body(&response.body));
        }

        Err(AttemptError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }

    async fn reload_with_retry(&self) -> Result<ReloadReport, ReloadError> {
        let max = self.retry_policy.max_attempts;
        let mut waits = self.retry_policy.backoff();
        let mut attempt = 1;

        loop {
            let error = match self.execute_request().await {
                Ok(report) => {
                    tracing::info!("Service reloaded settings from {}", self.endpoint);
                    return Ok(report);
                }
                Err(e) if !e.is_retryable() => return Err(e.into()),
                Err(e) => e,
            };

            let Some(delay) = waits.next() else {
                return Err(ReloadError::MaxRetriesExceeded {
                    attempts: attempt,
                    last_error: error,
                });
            };

            tracing::warn!("Reload attempt {attempt}/{max} failed: {error}. Retrying in {delay:?}");
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

impl<H: HttpClient, S: Sleeper> ReloadTrigger for HttpReloadTrigger<H, S> {
    async fn reload(&self) -> Result<ReloadReport, ReloadError> {
        self.reload_with_retry().await
    }
}

/// Extension trait for checking if an error is retryable.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidUrl(_) => false,
        }
    }
}

impl IsRetryable for AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            Self::NonSuccessStatus { status, .. } => {
                status.is_server_error()
                    || *status == http::StatusCode::TOO_MANY_REQUESTS
                    || *status == http::StatusCode::REQUEST_TIMEOUT
            }
        }
    }
}
