//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - JSON API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/skilltree", get(http::http_get_skill_tree))
        .route("/api/v1/skilltree/accessible", post(http::http_post_accessible))
        .route("/api/v1/skilltree/certificates/:id", get(http::http_get_certificate))
        .route("/api/v1/skilltree/goals/:id/prerequisites", get(http::http_get_prerequisites))
        .route("/api/v1/wheel/layout", post(http::http_post_wheel_layout))
        .route("/api/v1/wheel/spin", post(http::http_post_wheel_spin))
        .route("/api/v1/tokens", get(http::http_get_tokens))
        .route("/api/v1/tokens/spin", post(http::http_post_token_spin))
        .route("/api/v1/tokens/text", post(http::http_post_token_text))
        .route("/api/v1/story/entry", get(http::http_get_story_entry))
        .route("/api/v1/story/next", post(http::http_post_story_next))
        .route("/api/v1/quiz", get(http::http_get_quiz))
        .route("/api/v1/quiz/submit", post(http::http_post_quiz_submit))
        .route("/api/v1/survey", get(http::http_get_survey).post(http::http_post_survey))
        .route("/api/v1/feedback", get(http::http_list_feedback).post(http::http_post_feedback))
        .route("/api/v1/feedback/:id", delete(http::http_delete_feedback))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
