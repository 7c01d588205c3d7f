//! HTTP retrieval for the feed and for individual article pages.

use crate::types::{NewsError, PipelineConfig, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Thin wrapper over a shared [`reqwest::Client`] configured once from the
/// pipeline config (user agent, timeout, compression).
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &PipelineConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the feed XML. A non-success status is fatal to the whole request,
    /// per the propagation policy: without a feed there is nothing to serve.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching feed");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(NewsError::FeedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        info!(%url, bytes = body.len(), "fetched feed");
        Ok(body)
    }

    /// Fetch one article page. Failures here are isolated by the caller: a
    /// story simply proceeds without article content.
    pub async fn fetch_article(&self, url: &str) -> Result<String> {
        Url::parse(url)?;

        debug!(%url, "fetching article page");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(NewsError::ArticleStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
