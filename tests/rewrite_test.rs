use async_trait::async_trait;
use news_rewriter::{
    assemble, build_prompt, parse_feed, parse_rewrite, NewsError, OpenAiModel, PipelineConfig,
    Result, RewriteClient, RewriteConfig, RewriteModel, Story,
};
use std::sync::Arc;

fn story(id: &str, title: &str, summary: &str) -> Story {
    Story {
        id: id.to_string(),
        title: title.to_string(),
        better_title: None,
        summary: summary.to_string(),
        better_summary: None,
        source_url: None,
        article_content: None,
    }
}

/// Always answers with the same calm rewrite.
struct CalmModel;

#[async_trait]
impl RewriteModel for CalmModel {
    fn model_name(&self) -> String {
        "calm-mock".to_string()
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok("Title: Calm headline\nSummary: Calm summary".to_string())
    }
}

/// Fails whenever the prompt mentions the configured marker.
struct FlakyModel {
    fail_marker: &'static str,
}

#[async_trait]
impl RewriteModel for FlakyModel {
    fn model_name(&self) -> String {
        "flaky-mock".to_string()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.contains(self.fail_marker) {
            return Err(NewsError::RewriteStatus { status: 503 });
        }
        Ok("Title: Calm headline\nSummary: Calm summary".to_string())
    }
}

/// Returns text with no usable title or summary.
struct EmptyModel;

#[async_trait]
impl RewriteModel for EmptyModel {
    fn model_name(&self) -> String {
        "empty-mock".to_string()
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok("Title:   \nSummary:\n".to_string())
    }
}

#[test]
fn parse_rewrite_splits_on_first_newline_and_strips_labels() {
    let (title, summary) = parse_rewrite("Title: Calm headline\nSummary: Calm summary");
    assert_eq!(title.as_deref(), Some("Calm headline"));
    assert_eq!(summary.as_deref(), Some("Calm summary"));

    // Labels are optional and case-insensitive.
    let (title, summary) = parse_rewrite("Plain headline\nPlain summary line one\nline two");
    assert_eq!(title.as_deref(), Some("Plain headline"));
    assert_eq!(summary.as_deref(), Some("Plain summary line one\nline two"));

    let (title, summary) = parse_rewrite("TITLE: Loud\nSUMMARY: Quiet");
    assert_eq!(title.as_deref(), Some("Loud"));
    assert_eq!(summary.as_deref(), Some("Quiet"));
}

#[test]
fn parse_rewrite_yields_none_for_empty_parts() {
    let (title, summary) = parse_rewrite("Only a headline");
    assert_eq!(title.as_deref(), Some("Only a headline"));
    assert_eq!(summary, None);

    let (title, summary) = parse_rewrite("Title:  \nSummary:  ");
    assert_eq!(title, None);
    assert_eq!(summary, None);

    assert_eq!(parse_rewrite(""), (None, None));
}

#[test]
fn build_prompt_includes_story_and_truncated_content() {
    let mut s = story("story-1", "Big headline", "A summary.");
    s.article_content = Some("x".repeat(50));

    let prompt = build_prompt(&s, 10);
    assert!(prompt.contains("Headline: Big headline"));
    assert!(prompt.contains("Summary: A summary."));
    assert!(prompt.contains("Article content:\n"));
    assert!(prompt.contains(&format!("{}\u{2026}", "x".repeat(10))));
    assert!(!prompt.contains(&"x".repeat(11)));
}

#[test]
fn build_prompt_omits_content_section_when_absent() {
    let prompt = build_prompt(&story("story-1", "Headline", "Summary text"), 4000);
    assert!(!prompt.contains("Article content:"));
}

#[tokio::test]
async fn rewrite_populates_better_fields_and_keeps_originals() {
    let client = RewriteClient::new(Arc::new(CalmModel), 4000);
    let rewritten = client
        .rewrite_all(vec![story("story-1", "SHOCK twist!!", "You won't believe it")])
        .await;

    assert_eq!(rewritten.len(), 1);
    assert_eq!(rewritten[0].title, "SHOCK twist!!");
    assert_eq!(rewritten[0].summary, "You won't believe it");
    assert_eq!(rewritten[0].better_title.as_deref(), Some("Calm headline"));
    assert_eq!(rewritten[0].better_summary.as_deref(), Some("Calm summary"));
}

#[tokio::test]
async fn failed_rewrite_leaves_story_unchanged() {
    let client = RewriteClient::new(Arc::new(FlakyModel { fail_marker: "" }), 4000);
    // Empty marker: every prompt fails.
    let rewritten = client
        .rewrite_all(vec![story("story-1", "Original title", "Original summary")])
        .await;

    assert_eq!(rewritten[0].title, "Original title");
    assert_eq!(rewritten[0].summary, "Original summary");
    assert_eq!(rewritten[0].better_title, None);
    assert_eq!(rewritten[0].better_summary, None);
}

#[tokio::test]
async fn unusable_reply_falls_back_to_original() {
    let client = RewriteClient::new(Arc::new(EmptyModel), 4000);
    let rewritten = client
        .rewrite_all(vec![story("story-1", "Kept title", "Kept summary")])
        .await;

    assert_eq!(rewritten[0].better_title, None);
    assert_eq!(rewritten[0].better_summary, None);
}

#[tokio::test]
async fn one_failing_story_does_not_affect_the_batch() {
    let client = RewriteClient::new(
        Arc::new(FlakyModel {
            fail_marker: "Second",
        }),
        4000,
    );

    let stories = vec![
        story("story-1", "First headline", "s1"),
        story("story-2", "Second headline", "s2"),
        story("story-3", "Third headline", "s3"),
    ];
    let rewritten = client.rewrite_all(stories).await;

    assert_eq!(rewritten.len(), 3);
    // Order is preserved and neighbours still carry rewrites.
    assert_eq!(rewritten[0].id, "story-1");
    assert!(rewritten[0].better_title.is_some());
    assert_eq!(rewritten[1].id, "story-2");
    assert_eq!(rewritten[1].better_title, None);
    assert_eq!(rewritten[1].title, "Second headline");
    assert_eq!(rewritten[2].id, "story-3");
    assert!(rewritten[2].better_title.is_some());
}

#[tokio::test]
async fn rewrite_all_passes_through_empty_list() {
    let client = RewriteClient::new(Arc::new(CalmModel), 4000);
    assert!(client.rewrite_all(Vec::new()).await.is_empty());
}

#[test]
fn openai_model_requires_a_credential() {
    let config = RewriteConfig::default();
    assert!(OpenAiModel::new(&config).is_none());

    let config = RewriteConfig {
        api_key: Some(String::new()),
        ..RewriteConfig::default()
    };
    assert!(OpenAiModel::new(&config).is_none());

    let config = RewriteConfig {
        api_key: Some("sk-test".to_string()),
        ..RewriteConfig::default()
    };
    assert!(OpenAiModel::new(&config).is_some());
}

#[tokio::test]
async fn assembled_feed_round_trips_through_a_rewrite() {
    let xml = r#"<rss><channel>
      <item>
        <title>Loud headline</title>
        <link>https://example.com/a</link>
        <guid>g-1</guid>
        <description><![CDATA[<p>Something happened.</p>]]></description>
      </item>
    </channel></rss>"#;

    let config = PipelineConfig {
        fetch_articles: false,
        ..PipelineConfig::default()
    };
    let stories = assemble(&parse_feed(xml), &config);
    let rewritten = RewriteClient::new(Arc::new(CalmModel), 4000)
        .rewrite_all(stories)
        .await;

    assert_eq!(rewritten[0].id, "g-1");
    assert_eq!(rewritten[0].title, "Loud headline");
    assert_eq!(rewritten[0].summary, "Something happened.");
    assert_eq!(rewritten[0].better_title.as_deref(), Some("Calm headline"));
}
