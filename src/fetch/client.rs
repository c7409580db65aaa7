//! HTTP client construction
//!
//! One client is built per run and shared by every worker; reqwest pools
//! connections internally.

use crate::config::RunConfig;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for every fetch in a run
///
/// Redirects are followed (reqwest's default policy) since configured site
/// URLs commonly redirect to a canonical host. Plain HTTP is allowed so
/// local test servers work.
///
/// # Arguments
///
/// * `config` - The run configuration (supplies the per-request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &RunConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+https://github.com/sitepulse/sitepulse)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CaseStudyConfig, FetchConfig, OutputConfig, PipelineConfig, RateLimitConfig, RunConfig,
        SitesConfig,
    };
    use url::Url;

    fn create_test_config() -> RunConfig {
        RunConfig {
            sites: SitesConfig {
                urls: vec![Url::parse("https://example.com/").unwrap()],
            },
            rate_limit: RateLimitConfig {
                requests_per_minute: 60,
            },
            fetch: FetchConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig {
                artifact_path: "./summary.json".into(),
            },
            scratch: None,
            case_studies: CaseStudyConfig::default(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }
}
