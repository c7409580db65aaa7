//! Section extraction over parsed markup
//!
//! Rules are evaluated independently: a missing or failing section never
//! blocks the others. Visible text excludes script/style/noscript/iframe/
//! form/template subtrees.

use crate::config::RunConfig;
use crate::extract::rules::{section_rules, MatchMode, SectionRule, CASE_STUDY_DELIMITER};
use crate::extract::{ExtractError, ExtractedContent, Section};
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Subtrees that never contribute visible text
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "form", "template"];

/// Page chrome excluded from homepage content
const CHROME_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// Extracts the four content sections from a fetched body
///
/// A body with no recognizable markup yields a degenerate record with
/// `UnparseableMarkup` set and every section absent; this is degraded
/// output, not a failure.
///
/// # Arguments
///
/// * `site` - The site the body was fetched from
/// * `body` - The raw response body
/// * `config` - The run configuration (supplies the case-study selector)
pub fn extract_content(site: &Url, body: &str, config: &RunConfig) -> ExtractedContent {
    if !looks_like_markup(body) {
        tracing::warn!("[{}] Response body is not parseable markup", site);
        return ExtractedContent {
            site: site.clone(),
            sections: BTreeMap::new(),
            found_sections: BTreeSet::new(),
            error: Some(ExtractError::UnparseableMarkup),
        };
    }

    let document = Html::parse_document(body);
    let rules = section_rules(&config.case_studies.item_selector);

    let mut sections = BTreeMap::new();
    let mut found_sections = BTreeSet::new();

    for rule in &rules {
        if let Some(text) = apply_rule(&document, rule) {
            found_sections.insert(rule.section);
            sections.insert(rule.section, text);
        }
    }

    tracing::debug!(
        "[{}] Extracted {}/{} sections",
        site,
        found_sections.len(),
        Section::ALL.len()
    );

    ExtractedContent {
        site: site.clone(),
        sections,
        found_sections,
        error: None,
    }
}

/// Applies one rule; returns the raw section text if any selector matched
fn apply_rule(document: &Html, rule: &SectionRule) -> Option<String> {
    for selector_str in &rule.selectors {
        // Rule tables are static or validated at config load, but a bad
        // candidate must not take down its siblings
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let mut matches = document.select(&selector).peekable();
        if matches.peek().is_none() {
            continue;
        }

        let text = match rule.mode {
            MatchMode::First => matches
                .next()
                .map(|el| visible_text(el, rule.skip_chrome))
                .unwrap_or_default(),
            MatchMode::All => matches
                .map(|el| visible_text(el, rule.skip_chrome))
                .collect::<Vec<_>>()
                .join(CASE_STUDY_DELIMITER),
        };

        return Some(text);
    }

    None
}

/// Collects the visible text under an element
fn visible_text(element: ElementRef<'_>, skip_chrome: bool) -> String {
    let mut out = String::new();
    collect_text(element, skip_chrome, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, skip_chrome: bool, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIP_TAGS.contains(&name) {
                continue;
            }
            if skip_chrome && CHROME_TAGS.contains(&name) {
                continue;
            }
            collect_text(child_el, skip_chrome, out);
        }
    }
}

/// Cheap markup sanity check; scraper itself accepts anything
fn looks_like_markup(body: &str) -> bool {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    trimmed.contains('<') && trimmed.contains('>')
}
