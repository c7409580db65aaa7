//! Configuration module for the pipeline
//!
//! This module handles loading, parsing, and validating TOML run
//! configurations.
//!
//! # Example
//!
//! ```no_run
//! use sitepulse::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Sites to process: {}", config.sites.urls.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CaseStudyConfig, FetchConfig, OutputConfig, PipelineConfig, RateLimitConfig, RunConfig,
    ScratchConfig, SitesConfig,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_with_fingerprint};
