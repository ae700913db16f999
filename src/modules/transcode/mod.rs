use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

pub mod dto;
pub mod handler;
pub mod naming;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/codecs", post(handler::transcode_by_codec))
        .route("/commands", post(handler::transcode_by_command))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
}
