//! Entity decoding and markup stripping for feed text.
//!
//! Feeds publish titles and descriptions with XML entities, CDATA wrappers and
//! embedded HTML. Everything here is pure string work: no step can fail, and
//! malformed markup is treated as literal text to strip conservatively.

use once_cell::sync::Lazy;
use regex::Regex;

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p\s*>|<p(\s[^>]*)?>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static UNKNOWN_ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z]+;|&#[0-9]+;").unwrap());
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\u{a0}]+").unwrap());
static NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Decode the five standard XML/HTML named entities.
///
/// Unrecognized entities are left untouched; [`strip_markup`] collapses those
/// to whitespace instead. `&amp;` is decoded last so double-escaped text like
/// `&amp;lt;` decodes exactly once.
pub fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Reduce an HTML fragment to plain text.
///
/// `<br>` becomes a newline, paragraph boundaries become newlines, all other
/// tags are dropped, entities are decoded (unknown ones collapse to a space)
/// and whitespace runs are folded. Never fails on malformed markup.
pub fn strip_markup(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = BR_RE.replace_all(raw, "\n");
    let text = PARAGRAPH_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = UNKNOWN_ENTITY_RE.replace_all(&text, " ");
    let text = HSPACE_RE.replace_all(&text, " ");
    let text = NEWLINE_RE.replace_all(&text, "\n");

    text.trim().to_string()
}

/// Truncate to `max_chars` characters, appending an ellipsis when cut.
///
/// Counts characters rather than bytes so multi-byte text never splits inside
/// a code point.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => {
            let cut = text[..byte_index].trim_end();
            format!("{cut}\u{2026}")
        }
    }
}
