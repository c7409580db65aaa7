//! Sitepulse: a website content pipeline
//!
//! This crate fetches a configured list of websites under one shared rate
//! budget, extracts a fixed set of structured content sections, normalizes
//! the extracted text into per-site records, and aggregates those records
//! into a single versioned summary artifact.

pub mod aggregate;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod scratch;
pub mod transform;

use thiserror::Error;

/// Main error type for pipeline operations
///
/// Only configuration problems, HTTP client construction, and artifact
/// persistence are fatal to a run. Per-site fetch and extraction failures
/// are folded into that site's record and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] aggregate::AggregationError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid site URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Duplicate site URL in config: {0}")]
    DuplicateSite(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use aggregate::{SectionStats, SummaryArtifact};
pub use config::RunConfig;
pub use extract::{ExtractedContent, Section};
pub use fetch::{FetchError, FetchResult, RequestBudget};
pub use transform::{SiteRecord, SiteStatus};
