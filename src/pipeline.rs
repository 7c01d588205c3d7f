//! The per-request pipeline: fetch feed, parse, assemble, enrich, rewrite.
//!
//! Stateless and linear; everything is built fresh per request and discarded
//! after the response. Only the initial feed fetch is fatal: every per-story
//! failure downstream degrades that one story instead of the batch.

use crate::assembler::{assemble, attach_articles};
use crate::fetcher::Fetcher;
use crate::parser::parse_feed;
use crate::rewriter::{RewriteClient, RewriteModel};
use crate::types::{DetailLevel, PipelineConfig, Result, StoriesResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub struct NewsPipeline {
    config: PipelineConfig,
    fetcher: Fetcher,
    rewriter: Option<RewriteClient>,
}

impl NewsPipeline {
    /// Build a pipeline from explicit configuration and an optional rewrite
    /// backend. With no backend, stories are served with original text only.
    pub fn new(config: PipelineConfig, model: Option<Arc<dyn RewriteModel>>) -> Self {
        let fetcher = Fetcher::new(&config);
        let rewriter = model.map(|model| RewriteClient::new(model, config.article_content_limit));

        Self {
            config,
            fetcher,
            rewriter,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline once and produce the response payload.
    pub async fn run(&self) -> Result<StoriesResponse> {
        let xml = self.fetcher.fetch_feed(&self.config.feed_url).await?;
        let items = parse_feed(&xml);
        debug!(items = items.len(), "assembling stories");

        let mut stories = assemble(&items, &self.config);

        if self.config.fetch_articles {
            stories =
                attach_articles(&self.fetcher, stories, self.config.article_content_limit).await;
        }

        if let Some(rewriter) = &self.rewriter {
            stories = rewriter.rewrite_all(stories).await;
        }

        let detail = if self.config.fetch_articles {
            DetailLevel::Full
        } else {
            DetailLevel::Basic
        };

        info!(stories = stories.len(), ?detail, "pipeline complete");
        Ok(StoriesResponse {
            stories,
            detail,
            fetched_at: Utc::now(),
        })
    }
}
