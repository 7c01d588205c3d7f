//! Tolerant RSS item extraction.
//!
//! Deliberately not a strict XML parser: feeds in the wild carry unescaped
//! markup, stray CDATA and broken items, and one bad item must never cost the
//! whole feed. Items are located with a block regex and fields are read
//! per-block, so anything unreadable degrades to an empty field.

use crate::text::decode_entities;
use crate::types::RawFeedItem;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<item\b.*?</item>").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<link[^>]*>(.*?)</link>").unwrap());
static GUID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<guid[^>]*>(.*?)</guid>").unwrap());
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<description[^>]*>(.*?)</description>").unwrap());
static CONTENT_ENCODED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<content:encoded[^>]*>(.*?)</content:encoded>").unwrap());
static CDATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Extract every `<item>` block in document order.
///
/// A block missing a field yields an empty string for that field. The
/// `description` falls back to `content:encoded` when absent, as some feeds
/// only publish the latter.
pub fn parse_feed(xml: &str) -> Vec<RawFeedItem> {
    let mut items = Vec::new();

    for item_match in ITEM_RE.find_iter(xml) {
        let block = item_match.as_str();
        let description = {
            let description = extract_tag(block, &DESCRIPTION_RE);
            if description.is_empty() {
                extract_tag(block, &CONTENT_ENCODED_RE)
            } else {
                description
            }
        };

        items.push(RawFeedItem {
            title: extract_tag(block, &TITLE_RE),
            description,
            link: extract_tag(block, &LINK_RE),
            guid: extract_tag(block, &GUID_RE),
        });
    }

    debug!(count = items.len(), "parsed feed items");
    items
}

/// Read one tag's inner text: unwrap CDATA, decode entities, trim.
fn extract_tag(block: &str, tag_re: &Regex) -> String {
    let Some(captures) = tag_re.captures(block) else {
        return String::new();
    };
    let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let inner = CDATA_RE.replace_all(inner, "$1");
    decode_entities(inner.trim()).trim().to_string()
}
