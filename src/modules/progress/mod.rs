use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod handler;
pub mod hub;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(handler::progress_socket))
}
