use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::limit::RequestBodyLimitLayer;

pub mod dto;
pub mod error;
pub mod executor;
pub mod handler;
pub mod model;
pub mod resolver;

/// Intake enforces the real size limit while streaming; this cap only stops
/// clients that keep sending long after that.
pub fn router(max_upload_bytes: u64) -> Router<AppState> {
    let hard_cap = usize::try_from(max_upload_bytes.saturating_mul(2)).unwrap_or(usize::MAX);

    Router::new()
        .route("/upload", post(handler::upload_video))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(hard_cap))
}
