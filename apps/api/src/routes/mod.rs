pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the configured upload size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv/upload", post(handlers::handle_upload))
        .route("/api/v1/cv/parse", post(handlers::handle_parse))
        .route("/api/v1/cv/translate", post(handlers::handle_translate))
        .route("/api/v1/cv/render", post(handlers::handle_render))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
