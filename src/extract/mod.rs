//! Extraction module: structural section extraction from fetched markup
//!
//! Four named selector rules (homepage, navbar, footer, case studies) are
//! applied independently against the parsed document. Absence of a section
//! is a first-class outcome, not an error; only a body with no markup at
//! all degrades the whole extraction.

mod extractor;
mod rules;

pub use extractor::extract_content;
pub use rules::CASE_STUDY_DELIMITER;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use url::Url;

/// The structured content zones extracted per site
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Homepage,
    Navbar,
    Footer,
    CaseStudies,
}

impl Section {
    /// All sections, in canonical order
    pub const ALL: [Section; 4] = [
        Section::Homepage,
        Section::Navbar,
        Section::Footer,
        Section::CaseStudies,
    ];

    /// Stable section name used in the artifact and scratch records
    pub fn name(&self) -> &'static str {
        match self {
            Section::Homepage => "homepage",
            Section::Navbar => "navbar",
            Section::Footer => "footer",
            Section::CaseStudies => "case_studies",
        }
    }
}

/// Extraction failure kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("body contains no recognizable markup")]
    UnparseableMarkup,
}

/// Extracted raw section text for one site
///
/// `sections` holds the raw (un-normalized) text of every section whose
/// selector matched; `found_sections` records the matches even when the
/// matched node had no text. All-sections-absent is a valid degenerate
/// record.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub site: Url,
    pub sections: BTreeMap<Section, String>,
    pub found_sections: BTreeSet<Section>,
    pub error: Option<ExtractError>,
}

impl ExtractedContent {
    /// An extraction with every section absent (failed fetch or unparseable body)
    pub fn empty(site: Url) -> Self {
        Self {
            site,
            sections: BTreeMap::new(),
            found_sections: BTreeSet::new(),
            error: None,
        }
    }

    /// Raw text of a section, if its selector matched
    pub fn section_text(&self, section: Section) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }
}
