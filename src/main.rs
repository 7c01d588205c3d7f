use clap::Parser;
use news_rewriter::{
    create_app, AppState, NewsPipeline, OpenAiModel, PipelineConfig, RewriteConfig, RewriteModel,
};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Serve a news feed with headlines and summaries rewritten to be calmer.
#[derive(Parser, Debug)]
#[command(name = "news-rewriter", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    bind: SocketAddr,

    /// Override the upstream RSS feed URL (falls back to NEWS_FEED_URL).
    #[arg(long)]
    feed_url: Option<String>,

    /// Skip fetching article bodies (serve feed summaries only).
    #[arg(long)]
    no_articles: bool,

    /// Override the rewrite model name (falls back to OPENAI_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Directory of static front-end assets to serve at the root.
    #[arg(long, default_value = "web/public")]
    static_dir: PathBuf,
}

/// Resolve pipeline and rewrite configuration from CLI flags and the
/// environment. Flags win over environment variables; empty values count as
/// unset.
fn build_configs(args: &Cli) -> (PipelineConfig, RewriteConfig) {
    let mut config = PipelineConfig::default();
    if let Some(feed_url) = args
        .feed_url
        .clone()
        .or_else(|| env::var("NEWS_FEED_URL").ok())
        .filter(|url| !url.is_empty())
    {
        config.feed_url = feed_url;
    }
    config.fetch_articles = !args.no_articles;

    let mut rewrite_config = RewriteConfig::default();
    rewrite_config.api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty());
    if let Ok(api_url) = env::var("OPENAI_API_URL") {
        rewrite_config.api_url = api_url;
    }
    if let Some(model) = args
        .model
        .clone()
        .or_else(|| env::var("OPENAI_MODEL").ok())
        .filter(|model| !model.is_empty())
    {
        rewrite_config.model = model;
    }

    (config, rewrite_config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();
    let (config, rewrite_config) = build_configs(&args);

    let model: Option<Arc<dyn RewriteModel>> = match OpenAiModel::new(&rewrite_config) {
        Some(model) => Some(Arc::new(model)),
        None => {
            warn!("OPENAI_API_KEY not set; stories will be served without rewrites");
            None
        }
    };

    info!(
        feed_url = %config.feed_url,
        fetch_articles = config.fetch_articles,
        rewrites = model.is_some(),
        "starting news rewriter"
    );

    let pipeline = NewsPipeline::new(config, model);
    let static_dir = args.static_dir.is_dir().then_some(args.static_dir);
    if static_dir.is_none() {
        warn!("static asset directory not found; serving the API only");
    }

    let app = create_app(AppState { pipeline }, static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %args.bind, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    // Environment mutation is process-global, so everything runs in one test.
    #[test]
    fn environment_fills_in_unset_flags_and_flags_win() {
        env::set_var("NEWS_FEED_URL", "http://env-feed/feed");
        env::set_var("OPENAI_MODEL", "env-model");
        env::set_var("OPENAI_API_URL", "http://env-api/v1/chat/completions");
        env::set_var("OPENAI_API_KEY", "sk-env");

        let (config, rewrite_config) = build_configs(&cli(&["news-rewriter"]));
        assert_eq!(config.feed_url, "http://env-feed/feed");
        assert_eq!(rewrite_config.model, "env-model");
        assert_eq!(rewrite_config.api_url, "http://env-api/v1/chat/completions");
        assert_eq!(rewrite_config.api_key.as_deref(), Some("sk-env"));

        // Flags take precedence over the environment.
        let (config, rewrite_config) = build_configs(&cli(&[
            "news-rewriter",
            "--feed-url",
            "http://flag-feed/feed",
            "--model",
            "flag-model",
        ]));
        assert_eq!(config.feed_url, "http://flag-feed/feed");
        assert_eq!(rewrite_config.model, "flag-model");

        // Empty values count as unset.
        env::set_var("NEWS_FEED_URL", "");
        env::set_var("OPENAI_MODEL", "");
        env::set_var("OPENAI_API_KEY", "");
        let (config, rewrite_config) = build_configs(&cli(&["news-rewriter"]));
        assert_eq!(config.feed_url, PipelineConfig::default().feed_url);
        assert_eq!(rewrite_config.model, RewriteConfig::default().model);
        assert_eq!(rewrite_config.api_key, None);

        env::remove_var("NEWS_FEED_URL");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("OPENAI_API_URL");
        env::remove_var("OPENAI_API_KEY");
    }
}
