//! Transport-neutral request and response types.

use std::future::Future;
use std::time::Duration;

use http::{HeaderMap, Method, StatusCode};
use url::Url;

use super::HttpError;

/// A bodiless request. Both calls this crate makes, the reload `POST` and
/// the probe `GET`, carry everything they need in the URL and headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// `None` leaves the client's own limit in place.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Appends `headers`, keeping repeated names.
    #[must_use]
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        self.headers
            .extend(headers.iter().map(|(name, value)| (name.clone(), value.clone())));
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What came back, with the body read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body, if it is valid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Sends requests on behalf of the reload trigger and the URL probe.
pub trait HttpClient: Send + Sync {
    /// Resolves to the response whatever its status. Only transport
    /// failures are errors.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] or [`HttpError::Timeout`] when no response
    /// arrives, [`HttpError::InvalidUrl`] when the request cannot be built.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}
