//! HTTP surface: one GET endpoint plus optional static front-end assets.

use crate::pipeline::NewsPipeline;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::error;

pub struct AppState {
    pub pipeline: NewsPipeline,
}

/// Build the router. Non-GET methods on the news route get a `405` with an
/// `Allow: GET` header from the method router itself.
pub fn create_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::permissive();

    let mut router = Router::new()
        .route("/api/news", get(get_news))
        .layer(cors)
        .with_state(Arc::new(state));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Run the pipeline and serve the story list.
///
/// Any pipeline error means the upstream feed was unreachable (per-story
/// failures never propagate this far), so it surfaces as a plain-text 500.
async fn get_news(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.run().await {
        Ok(payload) => Json(payload).into_response(),
        Err(error) => {
            error!(%error, "failed to build story list");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch news stories",
            )
                .into_response()
        }
    }
}
