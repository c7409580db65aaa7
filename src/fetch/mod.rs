//! Fetch module: rate-limited, retrying HTTP fetches
//!
//! This module contains:
//! - HTTP client construction
//! - The shared per-run request budget (token bucket)
//! - The per-site fetch loop with retry and backoff

mod client;
mod fetcher;
mod limiter;

pub use client::build_http_client;
pub use fetcher::fetch_site;
pub use limiter::RequestBudget;

use thiserror::Error;
use url::Url;

/// Terminal failure kinds for a site fetch
///
/// A terminal error marks the site inactive downstream; it is never fatal
/// to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection refused or reset")]
    ConnectionRefused,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("retries exhausted after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
}

/// Result of fetching one site
///
/// Owned by the worker that produced it; `body` is absent on terminal
/// failure and `error` is absent on success.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The configured site URL
    pub site: Url,

    /// Response body, present only on success
    pub body: Option<String>,

    /// Last HTTP status observed, if any response was received
    pub status: Option<u16>,

    /// Number of attempts actually made
    pub attempts: u32,

    /// Terminal error, absent on success
    pub error: Option<FetchError>,
}

impl FetchResult {
    /// True when the fetch produced a usable body
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.body.is_some()
    }
}
