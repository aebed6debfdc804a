//! Plumbing for talking to the downstream service.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Asking the service to re-read its settings ([`ReloadTrigger`],
//!   [`HttpReloadTrigger`])
//! - Checking whether a URL answers at all ([`UrlProbe`])
//! - Retry policy configuration ([`RetryPolicy`])

mod client;
mod error;
mod http;
mod probe;
mod reload;
mod retry;


pub use client::ReqwestClient;
pub use error::{AttemptError, HttpError, ReloadError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use probe::{ProbeOutcome, UrlProbe};
pub use reload::{HttpReloadTrigger, IsRetryable, RELOAD_PATH, ReloadReport, ReloadTrigger};
pub use retry::{Backoff, RetryPolicy};
