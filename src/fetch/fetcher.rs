//! Per-site fetch loop with retry and backoff
//!
//! Each attempt takes one token from the shared budget. Transient failures
//! (timeouts, connection errors, 5xx) are retried with exponential backoff
//! up to the configured attempt limit; 4xx responses are terminal on first
//! sight.

use crate::config::RunConfig;
use crate::fetch::limiter::RequestBudget;
use crate::fetch::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Outcome of a single fetch attempt
enum AttemptOutcome {
    Success { status: u16, body: String },
    Transient(FetchError),
    Terminal(FetchError),
}

/// Fetches one site, retrying transient failures
///
/// Never fails the run: every outcome, including retry exhaustion, is
/// captured in the returned `FetchResult`.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `budget` - The shared request budget; one token is taken per attempt
/// * `site` - The site URL to fetch
/// * `config` - The run configuration (retry limit and backoff base)
pub async fn fetch_site(
    client: &Client,
    budget: &RequestBudget,
    site: &Url,
    config: &RunConfig,
) -> FetchResult {
    let max_attempts = config.fetch.max_retries;
    let mut attempts: u32 = 0;
    let mut last_status = None;

    while attempts < max_attempts {
        if attempts > 0 {
            let delay = backoff_delay(config.retry_backoff(), attempts);
            tracing::debug!(
                "[{}] Transient failure, retrying in {:?} (attempt {}/{})",
                site,
                delay,
                attempts + 1,
                max_attempts
            );
            tokio::time::sleep(delay).await;
        }

        budget.acquire().await;
        attempts += 1;

        match attempt_fetch(client, site).await {
            AttemptOutcome::Success { status, body } => {
                tracing::debug!("[{}] Fetched {} bytes (HTTP {})", site, body.len(), status);
                return FetchResult {
                    site: site.clone(),
                    body: Some(body),
                    status: Some(status),
                    attempts,
                    error: None,
                };
            }
            AttemptOutcome::Terminal(error) => {
                tracing::warn!("[{}] Terminal fetch error: {}", site, error);
                if let FetchError::HttpStatus(status) = error {
                    last_status = Some(status);
                }
                return FetchResult {
                    site: site.clone(),
                    body: None,
                    status: last_status,
                    attempts,
                    error: Some(error),
                };
            }
            AttemptOutcome::Transient(error) => {
                tracing::debug!("[{}] Attempt {} failed: {}", site, attempts, error);
                if let FetchError::HttpStatus(status) = error {
                    last_status = Some(status);
                }
            }
        }
    }

    tracing::warn!("[{}] Giving up after {} attempts", site, attempts);
    FetchResult {
        site: site.clone(),
        body: None,
        status: last_status,
        attempts,
        error: Some(FetchError::ExhaustedRetries { attempts }),
    }
}

/// Performs one HTTP GET and classifies the outcome
async fn attempt_fetch(client: &Client, site: &Url) -> AttemptOutcome {
    match client.get(site.clone()).send().await {
        Ok(response) => {
            let status = response.status();

            if status.is_success() {
                match response.text().await {
                    Ok(body) => AttemptOutcome::Success {
                        status: status.as_u16(),
                        body,
                    },
                    // Body read failed mid-stream: reset or timeout
                    Err(e) if e.is_timeout() => AttemptOutcome::Transient(FetchError::Timeout),
                    Err(_) => AttemptOutcome::Transient(FetchError::ConnectionRefused),
                }
            } else if status.is_server_error() {
                AttemptOutcome::Transient(FetchError::HttpStatus(status.as_u16()))
            } else {
                // 4xx and anything else non-retryable
                AttemptOutcome::Terminal(FetchError::HttpStatus(status.as_u16()))
            }
        }
        Err(e) => {
            if e.is_timeout() {
                AttemptOutcome::Transient(FetchError::Timeout)
            } else {
                AttemptOutcome::Transient(FetchError::ConnectionRefused)
            }
        }
    }
}

/// Exponential backoff: `base * 2^(completed_attempts - 1)`
fn backoff_delay(base: Duration, completed_attempts: u32) -> Duration {
    base * 2u32.saturating_pow(completed_attempts.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_handles_zero_attempts() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
    }

    // Fetch behavior against live responses (retry exhaustion, 4xx terminal,
    // attempt counting) is covered by the wiremock tests in tests/.
}
