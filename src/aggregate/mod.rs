//! Aggregation module: reducing site records into the summary artifact
//!
//! This module handles:
//! - Single-pass per-section statistics
//! - Building the versioned summary artifact
//! - Atomic persistence (temp file + rename)

mod artifact;
mod stats;

pub use artifact::{
    build_artifact, persist_artifact, AggregationError, RunMeta, SummaryArtifact, PIPELINE_VERSION,
};
pub use stats::SectionStats;

use crate::config::RunConfig;
use crate::transform::SiteRecord;

/// Builds and persists the artifact in one step
///
/// This is the aggregate-and-persist unit of work exposed to an external
/// orchestrator: it takes the complete record set and either fully replaces
/// the artifact or fails leaving the prior one untouched.
///
/// # Arguments
///
/// * `records` - One record per processed site, in config order
/// * `config` - The run configuration (supplies the artifact path)
/// * `meta` - Run metadata (start time, fingerprint, configured site count)
pub fn aggregate_and_persist(
    records: &[SiteRecord],
    config: &RunConfig,
    meta: &RunMeta,
) -> Result<SummaryArtifact, AggregationError> {
    let artifact = build_artifact(records, meta);
    persist_artifact(&artifact, &config.output.artifact_path)?;

    tracing::info!(
        "Aggregation complete | {} sites ({} active, {} inactive) | {}",
        artifact.total_sites,
        artifact.active_sites,
        artifact.inactive_sites,
        config.output.artifact_path.display()
    );

    Ok(artifact)
}
