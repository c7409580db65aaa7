use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure for a pipeline run
///
/// Immutable once loaded; the loader validates it and the rest of the run
/// only ever borrows it.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub sites: SitesConfig,
    #[serde(rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub scratch: Option<ScratchConfig>,
    #[serde(rename = "case-studies", default)]
    pub case_studies: CaseStudyConfig,
}

impl RunConfig {
    /// Per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    /// Base delay for the exponential retry backoff
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.fetch.retry_backoff_ms)
    }
}

/// The ordered list of sites to process
#[derive(Debug, Clone, Deserialize)]
pub struct SitesConfig {
    /// Site URLs, processed in this order; duplicates are rejected at load
    pub urls: Vec<Url>,
}

/// Shared outbound request budget
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Fetch attempts allowed per minute across the whole run
    #[serde(rename = "requests-per-minute")]
    pub requests_per_minute: u32,
}

/// Per-request fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum fetch attempts per site (first attempt included)
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff between transient failures
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Worker pool settings
///
/// The pool size bounds how many sites are in flight at once; the rate
/// limit separately bounds outbound request frequency.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the summary artifact JSON is written to
    #[serde(rename = "artifact-path")]
    pub artifact_path: PathBuf,
}

/// Optional scratch storage for raw bodies and per-site records
#[derive(Debug, Clone, Deserialize)]
pub struct ScratchConfig {
    pub dir: PathBuf,
}

/// Case-study item detection rule
#[derive(Debug, Clone, Deserialize)]
pub struct CaseStudyConfig {
    /// CSS selector matching one case-study item per match
    #[serde(rename = "item-selector", default = "default_case_study_selector")]
    pub item_selector: String,
}

impl Default for CaseStudyConfig {
    fn default() -> Self {
        Self {
            item_selector: default_case_study_selector(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_workers() -> usize {
    8
}

fn default_case_study_selector() -> String {
    "article.case-study, div.case-study, li.case-study, \
     article.success-story, div.success-story, li.success-story, \
     article.customer-story, div.customer-story"
        .to_string()
}
