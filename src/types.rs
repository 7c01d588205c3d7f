use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `<item>` block pulled out of the feed, before any normalization.
///
/// Missing fields are represented as empty strings rather than options so the
/// parser never has to fail an item; the assembler decides on fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: String,
    /// Raw markup as published in the feed; stripped by the assembler.
    pub description: String,
    pub link: String,
    pub guid: String,
}

/// A normalized story as returned to the front end.
///
/// `better_title`/`better_summary` are set only when the rewrite step produced
/// non-empty text for that part; they are never empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better_title: Option<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_content: Option<String>,
}

/// Whether article-body enrichment was active for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Stories carry feed titles and summaries only.
    Basic,
    /// Stories were enriched with extracted article bodies where available.
    Full,
}

/// JSON payload served to the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoriesResponse {
    pub stories: Vec<Story>,
    pub detail: DetailLevel,
    pub fetched_at: DateTime<Utc>,
}

/// Immutable configuration for one pipeline instance.
///
/// Passed explicitly into the pipeline entry point so tests can substitute
/// local fixture endpoints.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feed_url: String,
    pub max_stories: usize,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// When false the article fan-out is skipped and `detail` is `basic`.
    pub fetch_articles: bool,
    /// Character budget for stored article bodies and rewrite prompts.
    pub article_content_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://www.express.co.uk/posts/rss/1".to_string(),
            max_stories: 12,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36"
                .to_string(),
            timeout_seconds: 30,
            fetch_articles: true,
            article_content_limit: 4000,
        }
    }
}

/// Configuration for the text-generation endpoint.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub api_url: String,
    /// Bearer credential; rewriting is skipped entirely when absent.
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-5-nano".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed request failed with status {status}")]
    FeedStatus { status: u16 },

    #[error("article request failed with status {status}")]
    ArticleStatus { status: u16 },

    #[error("rewrite request failed with status {status}")]
    RewriteStatus { status: u16 },

    #[error("rewrite response contained no usable text")]
    RewriteEmpty,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, NewsError>;
