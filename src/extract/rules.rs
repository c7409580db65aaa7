//! Named section extraction rules
//!
//! Each rule is an ordered list of CSS selectors tried until one matches.
//! Adding a new section means adding a rule here; the extractor's control
//! flow does not change.

use crate::extract::Section;

/// Delimiter between case-study item texts in the raw section blob
///
/// The transformer counts items by splitting on this, so the count is
/// derivable from the text alone.
pub const CASE_STUDY_DELIMITER: &str = "\n\n";

/// How matched nodes contribute to the section text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchMode {
    /// First matching node wins
    First,
    /// Every matching node is one item; texts are joined with the delimiter
    All,
}

/// One named extraction rule
#[derive(Debug, Clone)]
pub(crate) struct SectionRule {
    pub section: Section,
    /// Ordered candidates; the first selector with at least one match is used
    pub selectors: Vec<String>,
    pub mode: MatchMode,
    /// Drop nav/header/footer/aside subtrees while collecting text
    pub skip_chrome: bool,
}

/// Builds the rule set for a run
///
/// Selector candidates follow the common semantic-tag-first, class-pattern
///-fallback convention; the case-study item selector comes from the run
/// configuration.
pub(crate) fn section_rules(case_study_selector: &str) -> Vec<SectionRule> {
    vec![
        SectionRule {
            section: Section::Homepage,
            selectors: vec![
                "main".to_string(),
                "[role='main']".to_string(),
                "[class*='main-content']".to_string(),
                "[class*='page-content']".to_string(),
                "#content".to_string(),
                "body".to_string(),
            ],
            mode: MatchMode::First,
            skip_chrome: true,
        },
        SectionRule {
            section: Section::Navbar,
            selectors: vec![
                "nav".to_string(),
                "[class*='navbar']".to_string(),
                "[id*='navbar']".to_string(),
                "[class*='main-menu']".to_string(),
                "[class*='navigation']".to_string(),
                "[class*='site-header']".to_string(),
                "header".to_string(),
            ],
            mode: MatchMode::First,
            skip_chrome: false,
        },
        SectionRule {
            section: Section::Footer,
            selectors: vec![
                "footer".to_string(),
                "[class*='footer']".to_string(),
                "[id*='footer']".to_string(),
                "[class*='copyright']".to_string(),
            ],
            mode: MatchMode::First,
            skip_chrome: false,
        },
        SectionRule {
            section: Section::CaseStudies,
            selectors: vec![case_study_selector.to_string()],
            mode: MatchMode::All,
            skip_chrome: false,
        },
    ]
}
