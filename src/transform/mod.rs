//! Transform module: normalization into canonical per-site records
//!
//! Pure and deterministic: no I/O, no clocks. Given the same fetch result
//! and extracted content, the output record is identical.

use crate::extract::{ExtractedContent, Section, CASE_STUDY_DELIMITER};
use crate::fetch::FetchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Derived site status
///
/// Active means the fetch succeeded and at least one section is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Inactive,
}

/// Normalized measurements for one section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMetrics {
    /// Character count of the normalized text (0 if the section is absent)
    pub length: u64,

    /// True when the normalized text contains anything at all
    pub non_empty: bool,
}

/// Canonical per-site pipeline output
///
/// Exactly one record exists per processed site, success or failure. All
/// four sections are always present in `sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub site: Url,
    pub status: SiteStatus,
    pub sections: BTreeMap<Section, SectionMetrics>,
    pub case_study_count: u64,
    pub fetch_attempts: u32,
    pub fetch_status: Option<u16>,
}

impl SiteRecord {
    pub fn is_active(&self) -> bool {
        self.status == SiteStatus::Active
    }

    /// Metrics for a section; zeroed if somehow missing
    pub fn section(&self, section: Section) -> SectionMetrics {
        self.sections.get(&section).copied().unwrap_or_default()
    }
}

/// Produces the canonical record for one site
///
/// # Arguments
///
/// * `fetched` - The terminal fetch result for the site
/// * `extracted` - The extracted sections (empty for failed fetches)
pub fn transform_site(fetched: &FetchResult, extracted: &ExtractedContent) -> SiteRecord {
    let mut sections = BTreeMap::new();
    let mut any_non_empty = false;

    for section in Section::ALL {
        let normalized = extracted
            .section_text(section)
            .map(normalize_text)
            .unwrap_or_default();
        let length = normalized.chars().count() as u64;
        let non_empty = length > 0;
        any_non_empty |= non_empty;
        sections.insert(section, SectionMetrics { length, non_empty });
    }

    let case_study_count = extracted
        .section_text(Section::CaseStudies)
        .map(count_case_study_items)
        .unwrap_or(0);

    let status = if fetched.is_success() && any_non_empty {
        SiteStatus::Active
    } else {
        SiteStatus::Inactive
    };

    SiteRecord {
        site: extracted.site.clone(),
        status,
        sections,
        case_study_count,
        fetch_attempts: fetched.attempts,
        fetch_status: fetched.status,
    }
}

/// Normalizes raw extracted text
///
/// Trims, collapses internal whitespace runs to single spaces, and strips
/// zero-width characters.
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}'))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Counts case-study items in the raw section blob
///
/// One item per non-blank block between delimiters; the extractor emits one
/// block per matched item node, so a matched-but-textless card does not
/// count.
pub fn count_case_study_items(raw: &str) -> u64 {
    raw.split(CASE_STUDY_DELIMITER)
        .filter(|item| !item.trim().is_empty())
        .count() as u64
}
