use crate::config::types::{
    CaseStudyConfig, FetchConfig, OutputConfig, PipelineConfig, RateLimitConfig, RunConfig,
    SitesConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &RunConfig) -> Result<(), ConfigError> {
    validate_sites(&config.sites)?;
    validate_rate_limit(&config.rate_limit)?;
    validate_fetch(&config.fetch)?;
    validate_pipeline(&config.pipeline)?;
    validate_output(&config.output)?;
    validate_case_studies(&config.case_studies)?;
    Ok(())
}

/// Validates the site list: non-empty, absolute HTTP(S) URLs, no duplicates
fn validate_sites(sites: &SitesConfig) -> Result<(), ConfigError> {
    if sites.urls.is_empty() {
        return Err(ConfigError::Validation(
            "site list must contain at least one URL".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for url in &sites.urls {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("scheme must be http or https, got '{}'", url.scheme()),
            });
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            });
        }

        if !seen.insert(url.as_str()) {
            return Err(ConfigError::DuplicateSite(url.to_string()));
        }
    }

    Ok(())
}

/// Validates rate limit settings
fn validate_rate_limit(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if config.requests_per_minute < 1 {
        return Err(ConfigError::Validation(format!(
            "requests-per-minute must be >= 1, got {}",
            config.requests_per_minute
        )));
    }

    Ok(())
}

/// Validates fetch settings
fn validate_fetch(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates worker pool settings
fn validate_pipeline(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates output settings
fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.artifact_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "artifact-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the case-study item selector parses as CSS
fn validate_case_studies(config: &CaseStudyConfig) -> Result<(), ConfigError> {
    Selector::parse(&config.item_selector).map_err(|e| {
        ConfigError::Validation(format!(
            "invalid case-study item-selector '{}': {}",
            config.item_selector, e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::OutputConfig;
    use url::Url;

    fn base_config(urls: Vec<&str>) -> RunConfig {
        RunConfig {
            sites: SitesConfig {
                urls: urls.iter().map(|u| Url::parse(u).unwrap()).collect(),
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
    fn test_valid_config() {
        let config = base_config(vec!["https://example.com/", "https://other.org/"]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_site_list_rejected() {
        let config = base_config(vec![]);
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_duplicate_site_rejected() {
        let config = base_config(vec!["https://example.com/", "https://example.com/"]);
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::DuplicateSite(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = base_config(vec!["ftp://example.com/"]);
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let mut config = base_config(vec!["https://example.com/"]);
        config.rate_limit.requests_per_minute = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = base_config(vec!["https://example.com/"]);
        config.pipeline.workers = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_item_selector_rejected() {
        let mut config = base_config(vec!["https://example.com/"]);
        config.case_studies.item_selector = ":::not a selector:::".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
