//! Error types for service operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure of a single reload attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The request did not complete.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The service answered with a non-2xx status.
    #[error("Service returned {status}{}", body_suffix(.body.as_deref()))]
    NonSuccessStatus {
        /// Response status
        status: http::StatusCode,
        /// Response body, if it was text
        body: Option<String>,
    },
}

/// Error type for reload requests.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// No service URL is configured.
    #[error("No service URL configured (set --service-url or service.url)")]
    NotConfigured,

    /// An attempt failed in a way retrying cannot fix.
    #[error(transparent)]
    Attempt(#[from] AttemptError),

    /// Every attempt failed.
    #[error("Reload failed after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last_error: AttemptError,
    },
}

fn body_suffix(body: Option<&str>) -> String {
    body.filter(|b| !b.trim().is_empty())
        .map(|b| format!(": {}", b.trim()))
        .unwrap_or_default()
}
