pub mod assembler;
pub mod extractor;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod rewriter;
pub mod server;
pub mod text;
pub mod types;

pub use assembler::{assemble, attach_articles};
pub use extractor::extract_body;
pub use fetcher::Fetcher;
pub use parser::parse_feed;
pub use pipeline::NewsPipeline;
pub use rewriter::{build_prompt, parse_rewrite, OpenAiModel, RewriteClient, RewriteModel};
pub use server::{create_app, AppState};
pub use text::{decode_entities, strip_markup};
pub use types::*;
