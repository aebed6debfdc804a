//! `reqwest`-backed [`HttpClient`].

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Sent with every request so the service can tell the editor apart in
/// its access log.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`HttpClient`] over a shared `reqwest::Client`.
///
/// Clones share one connection pool, so the reload trigger and the URL
/// probe can hold the same client.
///
/// # Example
///
/// ```no_run
/// use seerr_settings::service::{HttpClient, HttpRequest, ReqwestClient};
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("http://localhost:8777/reload-env")?;
/// let response = client
///     .request(HttpRequest::post(url).with_timeout(Duration::from_secs(5)))
///     .await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client that identifies itself as `seerr-settings/<version>`.
    #[must_use]
    pub fn new() -> Self {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {e}");
                reqwest::Client::new()
            });
        Self { inner }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            timeout,
        } = req;

        let mut builder = self.inner.request(method, url).headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(HttpResponse::new(status, headers, body.to_vec()))
    }
}

/// Maps a transport failure onto the crate's error kinds.
fn classify(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_builder() {
        HttpError::InvalidUrl(error.to_string())
    } else {
        HttpError::Connection(Box::new(error))
    }
}
