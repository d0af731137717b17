//! Lead-paragraph extraction from wiki article HTML.
//!
//! Only the *direct* `<p>` children of the article container are considered,
//! which leaves out infobox, quote and citation text nested deeper in the tree.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// CSS selector of the element holding the article body.
pub const CONTENT_SELECTOR: &str = "div.mw-parser-output";

/// Prefix marking a navigational artifact rather than prose.
const ARTIFACT_PREFIX: &str = "aside";

/// Thresholds controlling which paragraphs are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractRules {
    /// Keep a paragraph only if its cleaned length (in chars) exceeds this.
    pub min_len: usize,
    /// Stop after this many paragraphs.
    pub max_paragraphs: usize,
}

/// Extract the qualifying lead paragraphs of an article.
///
/// Returns `None` when the page has no content container, otherwise the kept
/// paragraphs in document order (possibly empty).
pub fn extract_lead_paragraphs(html: &str, rules: &ExtractRules) -> Option<Vec<String>> {
    let doc = Html::parse_document(html);
    let container_sel = Selector::parse(CONTENT_SELECTOR).expect("valid selector");
    let container = doc.select(&container_sel).next()?;

    let mut paragraphs = Vec::new();
    for child in container.children().filter_map(ElementRef::wrap) {
        if paragraphs.len() >= rules.max_paragraphs {
            break;
        }
        if child.value().name() != "p" {
            continue;
        }

        let text = clean_text(&child.text().collect::<String>());
        if text.chars().count() > rules.min_len && !is_artifact(&text) {
            paragraphs.push(text);
        }
    }

    Some(paragraphs)
}

/// Collapse whitespace runs, drop numeric citation markers and trim.
pub fn clean_text(raw: &str) -> String {
    static CITATION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid regex"));
    static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let without_citations = CITATION_RE.replace_all(raw, "");
    SPACE_RE
        .replace_all(&without_citations, " ")
        .trim()
        .to_string()
}

fn is_artifact(text: &str) -> bool {
    text.get(..ARTIFACT_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(ARTIFACT_PREFIX))
}
