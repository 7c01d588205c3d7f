//! Feed items to normalized stories, plus the per-story article fan-out.

use crate::extractor::extract_body;
use crate::fetcher::Fetcher;
use crate::text::{strip_markup, truncate_with_ellipsis};
use crate::types::{PipelineConfig, RawFeedItem, Story};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Build the bounded, ordered story list from parsed feed items.
///
/// The list is truncated to `max_stories` and preserves feed order. A story's
/// `id` is its guid when present and unique, otherwise the positional fallback
/// `story-<n>` (1-based); `title` falls back to `"Untitled story"`; `summary`
/// is the markup-stripped description.
pub fn assemble(items: &[RawFeedItem], config: &PipelineConfig) -> Vec<Story> {
    let mut seen_ids = HashSet::new();

    items
        .iter()
        .take(config.max_stories)
        .enumerate()
        .map(|(index, item)| {
            let guid = item.guid.trim();
            let id = if guid.is_empty() || !seen_ids.insert(guid.to_string()) {
                format!("story-{}", index + 1)
            } else {
                guid.to_string()
            };

            let title = item.title.trim();
            let title = if title.is_empty() {
                "Untitled story".to_string()
            } else {
                title.to_string()
            };

            let link = item.link.trim();
            let source_url = (!link.is_empty()).then(|| link.to_string());

            Story {
                id,
                title,
                better_title: None,
                summary: strip_markup(&item.description),
                better_summary: None,
                source_url,
                article_content: None,
            }
        })
        .collect()
}

/// Fetch and attach article bodies, one concurrent task per story.
///
/// Each task operates on its own story and the results are joined by original
/// index, so final ordering never depends on completion order. A failed fetch
/// or an empty extraction leaves that one story without `article_content` and
/// affects no other story.
pub async fn attach_articles(fetcher: &Fetcher, stories: Vec<Story>, content_limit: usize) -> Vec<Story> {
    let tasks = stories.into_iter().map(|mut story| async move {
        let Some(url) = story.source_url.clone() else {
            return story;
        };

        match fetcher.fetch_article(&url).await {
            Ok(html) => {
                let body = extract_body(&html);
                if body.is_empty() {
                    debug!(story = %story.id, "no article body extracted");
                } else {
                    story.article_content = Some(truncate_with_ellipsis(&body, content_limit));
                }
            }
            Err(error) => {
                warn!(story = %story.id, %url, %error, "article fetch failed; continuing without content");
            }
        }

        story
    });

    join_all(tasks).await
}
