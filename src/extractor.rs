//! Best-effort article body extraction.
//!
//! Extraction is an ordered list of strategies tried in sequence, stopping at
//! the first non-empty result: known content containers, then page-level
//! description metadata, then the empty string. Malformed HTML degrades to the
//! next tier rather than erroring.

use scraper::{Html, Selector};
use tracing::trace;

/// Paragraph containers tried in priority order.
const CONTENT_SELECTORS: &[&str] = &[
    "div.text-description p",
    "article p",
    "div.article-content p",
];

/// Page-level description fallbacks, Open Graph first.
const META_SELECTORS: &[&str] = &[
    r#"meta[property="og:description"]"#,
    r#"meta[name="description"]"#,
];

/// Extract a plain-text article body from an HTML page.
///
/// Returns an empty string when nothing extractable is found; absence of text
/// is a valid result, not an error.
pub fn extract_body(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            trace!(paragraphs = paragraphs.len(), "extracted article paragraphs");
            return paragraphs.join("\n");
        }
    }

    for selector in META_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
        {
            let content = content.trim();
            if !content.is_empty() {
                trace!("falling back to meta description");
                return content.to_string();
            }
        }
    }

    String::new()
}
