//! Headline/summary rewriting through an external text-generation endpoint.
//!
//! The model sits behind the [`RewriteModel`] trait so tests can substitute a
//! scripted implementation. Rewrites run concurrently and independently per
//! story: a failed or unusable rewrite keeps that story's original text and
//! never cancels the rest of the batch.

use crate::text::truncate_with_ellipsis;
use crate::types::{NewsError, Result, RewriteConfig, Story};
use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

static TITLE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*title\s*:?\s*").unwrap());
static SUMMARY_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*summary\s*:?\s*").unwrap());

/// Trait for text-generation backends that can complete a rewrite prompt.
#[async_trait]
pub trait RewriteModel: Send + Sync {
    /// Human-readable name for logging.
    fn model_name(&self) -> String;

    /// Send one prompt and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Build the rewrite prompt for one story.
///
/// Article content, when present, is appended under its own heading and
/// truncated to `content_limit` characters with an ellipsis marker.
pub fn build_prompt(story: &Story, content_limit: usize) -> String {
    let mut prompt = format!(
        "Rewrite the headline and summary below so they remain factual, concise, \
         and non-clickbait. Separate the rewritten headline and summary with a newline.\
         \n\nHeadline: {}\nSummary: {}",
        story.title, story.summary
    );

    if let Some(content) = story.article_content.as_deref() {
        if !content.is_empty() {
            prompt.push_str("\n\nArticle content:\n");
            prompt.push_str(&truncate_with_ellipsis(content, content_limit));
        }
    }

    prompt
}

/// Split a model reply into rewritten title and summary.
///
/// The text before the first newline becomes the title, the remainder the
/// summary; optional leading `Title:`/`Summary:` labels are stripped. A part
/// that is empty after trimming yields `None` so callers keep the original.
pub fn parse_rewrite(reply: &str) -> (Option<String>, Option<String>) {
    let (first_line, remainder) = match reply.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (reply, ""),
    };

    let title = TITLE_LABEL_RE.replace(first_line, "").trim().to_string();
    let summary = SUMMARY_LABEL_RE
        .replace(remainder.trim_start(), "")
        .trim()
        .to_string();

    (
        (!title.is_empty()).then_some(title),
        (!summary.is_empty()).then_some(summary),
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions backend.
pub struct OpenAiModel {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiModel {
    /// Returns `None` when no credential is configured, in which case the
    /// pipeline skips rewriting entirely.
    pub fn new(config: &RewriteConfig) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|key| !key.is_empty())?;

        Some(Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl RewriteModel for OpenAiModel {
    fn model_name(&self) -> String {
        self.model.clone()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::RewriteStatus {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(NewsError::RewriteEmpty)
    }
}

/// Runs the rewrite fan-out over a story list.
pub struct RewriteClient {
    model: Arc<dyn RewriteModel>,
    content_limit: usize,
}

impl RewriteClient {
    pub fn new(model: Arc<dyn RewriteModel>, content_limit: usize) -> Self {
        Self {
            model,
            content_limit,
        }
    }

    /// Rewrite every story concurrently, preserving input order.
    ///
    /// Each story's rewrite is isolated: one failure degrades that story to
    /// its original text and leaves the others untouched.
    pub async fn rewrite_all(&self, stories: Vec<Story>) -> Vec<Story> {
        if stories.is_empty() {
            return stories;
        }

        info!(
            count = stories.len(),
            model = %self.model.model_name(),
            "rewriting stories"
        );

        let tasks = stories.into_iter().map(|story| self.rewrite_story(story));
        join_all(tasks).await
    }

    async fn rewrite_story(&self, mut story: Story) -> Story {
        let prompt = build_prompt(&story, self.content_limit);

        match self.model.complete(&prompt).await {
            Ok(reply) => {
                let (better_title, better_summary) = parse_rewrite(&reply);
                if better_title.is_none() && better_summary.is_none() {
                    warn!(story = %story.id, "rewrite reply had no usable text; keeping original");
                }
                story.better_title = better_title;
                story.better_summary = better_summary;
            }
            Err(error) => {
                warn!(story = %story.id, %error, "rewrite failed; keeping original text");
            }
        }

        story
    }
}
