//! The versioned summary artifact and its atomic persistence
//!
//! Field names are a data contract with the downstream dashboard; they must
//! stay stable across versions, with `pipeline_version` signaling schema
//! drift.

use crate::aggregate::stats::{SectionAccumulator, SectionStats};
use crate::extract::Section;
use crate::transform::SiteRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Schema version recorded in every artifact
pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can occur while persisting the artifact
///
/// Computation itself cannot fail on well-formed records; only
/// serialization and I/O can.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed to serialize summary artifact: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist summary artifact to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Run-level metadata carried into the artifact
#[derive(Debug, Clone)]
pub struct RunMeta {
    /// Run start time (UTC); becomes the artifact timestamp
    pub started_at: DateTime<Utc>,

    /// Fingerprint of the site list and rate parameters
    pub config_fingerprint: String,

    /// Number of sites in the run configuration
    pub sites_configured: u64,
}

/// The aggregate summary document, one per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryArtifact {
    pub pipeline_version: String,
    pub generated_at: DateTime<Utc>,
    pub config_fingerprint: String,
    pub total_sites: u64,
    pub active_sites: u64,
    pub inactive_sites: u64,
    pub total_case_studies: u64,
    pub sections: BTreeMap<Section, SectionStats>,
    /// Sites in the config; equals `total_sites` unless the run was cancelled
    pub sites_configured: u64,
    /// True when cancellation left some configured sites unprocessed
    pub partial: bool,
}

/// Reduces the complete record set into the summary artifact
///
/// Single pass: running min/max/sum/count per section plus global counters.
/// Per-section statistics only cover sites where that section is non-empty.
pub fn build_artifact(records: &[SiteRecord], meta: &RunMeta) -> SummaryArtifact {
    let mut active_sites = 0u64;
    let mut total_case_studies = 0u64;
    let mut accumulators: BTreeMap<Section, SectionAccumulator> = Section::ALL
        .iter()
        .map(|s| (*s, SectionAccumulator::default()))
        .collect();

    for record in records {
        if record.is_active() {
            active_sites += 1;
        }
        total_case_studies += record.case_study_count;

        for section in Section::ALL {
            let metrics = record.section(section);
            if metrics.non_empty {
                if let Some(acc) = accumulators.get_mut(&section) {
                    acc.observe(metrics.length);
                }
            }
        }
    }

    let total_sites = records.len() as u64;

    SummaryArtifact {
        pipeline_version: PIPELINE_VERSION.to_string(),
        generated_at: meta.started_at,
        config_fingerprint: meta.config_fingerprint.clone(),
        total_sites,
        active_sites,
        inactive_sites: total_sites - active_sites,
        total_case_studies,
        sections: accumulators
            .iter()
            .map(|(section, acc)| (*section, acc.finish()))
            .collect(),
        sites_configured: meta.sites_configured,
        partial: total_sites < meta.sites_configured,
    }
}

/// Writes the artifact atomically, fully replacing any prior artifact
///
/// The JSON is written to a temp file in the destination directory and
/// renamed into place, so a reader sees either the prior artifact or the
/// complete new one, never a half-written document.
pub fn persist_artifact(artifact: &SummaryArtifact, path: &Path) -> Result<(), AggregationError> {
    let json = serde_json::to_vec_pretty(artifact)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let persist_err = |source: std::io::Error| AggregationError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
    tmp.write_all(&json).map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;

    tracing::info!("Summary artifact written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{SectionMetrics, SiteStatus};
    use url::Url;

    fn meta(sites_configured: u64) -> RunMeta {
        RunMeta {
            started_at: "2026-08-01T00:00:00Z".parse().unwrap(),
            config_fingerprint: "abc123".to_string(),
            sites_configured,
        }
    }

    fn record(url: &str, status: SiteStatus, homepage_len: u64, case_studies: u64) -> SiteRecord {
        let mut sections = BTreeMap::new();
        for section in Section::ALL {
            sections.insert(section, SectionMetrics::default());
        }
        sections.insert(
            Section::Homepage,
            SectionMetrics {
                length: homepage_len,
                non_empty: homepage_len > 0,
            },
        );

        SiteRecord {
            site: Url::parse(url).unwrap(),
            status,
            sections,
            case_study_count: case_studies,
            fetch_attempts: 1,
            fetch_status: Some(200),
        }
    }

    #[test]
    fn test_counts_add_up() {
        let records = vec![
            record("https://a.com/", SiteStatus::Active, 100, 2),
            record("https://b.com/", SiteStatus::Inactive, 0, 0),
            record("https://c.com/", SiteStatus::Active, 300, 1),
        ];

        let artifact = build_artifact(&records, &meta(3));

        assert_eq!(artifact.total_sites, 3);
        assert_eq!(artifact.active_sites, 2);
        assert_eq!(artifact.inactive_sites, 1);
        assert_eq!(artifact.active_sites + artifact.inactive_sites, artifact.total_sites);
        assert_eq!(artifact.total_case_studies, 3);
        assert!(!artifact.partial);
    }

    #[test]
    fn test_section_stats_cover_non_empty_only() {
        let records = vec![
            record("https://a.com/", SiteStatus::Active, 100, 0),
            record("https://b.com/", SiteStatus::Inactive, 0, 0),
            record("https://c.com/", SiteStatus::Active, 300, 0),
        ];

        let artifact = build_artifact(&records, &meta(3));
        let homepage = &artifact.sections[&Section::Homepage];

        assert_eq!(homepage.min, Some(100));
        assert_eq!(homepage.max, Some(300));
        assert_eq!(homepage.mean, Some(200.0));
        assert_eq!(homepage.sites_with_content, 2);
    }

    #[test]
    fn test_untouched_section_reports_sentinels() {
        let records = vec![record("https://a.com/", SiteStatus::Active, 100, 0)];

        let artifact = build_artifact(&records, &meta(1));
        let footer = &artifact.sections[&Section::Footer];

        assert_eq!(footer.min, None);
        assert_eq!(footer.max, None);
        assert_eq!(footer.mean, None);
        assert_eq!(footer.sites_with_content, 0);
    }

    #[test]
    fn test_empty_record_set() {
        let artifact = build_artifact(&[], &meta(0));

        assert_eq!(artifact.total_sites, 0);
        assert_eq!(artifact.active_sites, 0);
        assert_eq!(artifact.inactive_sites, 0);
        assert_eq!(artifact.sections.len(), Section::ALL.len());
    }

    #[test]
    fn test_cancelled_run_is_marked_partial() {
        let records = vec![record("https://a.com/", SiteStatus::Active, 100, 0)];
        let artifact = build_artifact(&records, &meta(5));

        assert!(artifact.partial);
        assert_eq!(artifact.sites_configured, 5);
        assert_eq!(artifact.total_sites, 1);
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        let artifact = build_artifact(
            &[record("https://a.com/", SiteStatus::Active, 10, 1)],
            &meta(1),
        );
        persist_artifact(&artifact, &path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let restored: SummaryArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, artifact);
    }

    #[test]
    fn test_artifact_field_names_are_stable() {
        let artifact = build_artifact(&[], &meta(0));
        let json = serde_json::to_value(&artifact).unwrap();

        for field in [
            "pipeline_version",
            "generated_at",
            "config_fingerprint",
            "total_sites",
            "active_sites",
            "inactive_sites",
            "total_case_studies",
            "sections",
            "sites_configured",
            "partial",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert!(json["sections"].get("case_studies").is_some());
    }

    #[test]
    fn test_failed_persist_leaves_prior_artifact_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        let prior = build_artifact(&[], &meta(0));
        persist_artifact(&prior, &path).unwrap();
        let before = std::fs::read(&path).unwrap();

        // A destination whose parent is a regular file cannot be written
        let bad_path = path.join("nested").join("summary.json");
        let next = build_artifact(
            &[record("https://a.com/", SiteStatus::Active, 10, 0)],
            &meta(1),
        );
        let result = persist_artifact(&next, &bad_path);
        assert!(matches!(result, Err(AggregationError::Persist { .. })));

        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }
}
