//! HTTP surface for labelpress.
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /api/v1/labels/:id?type=<label_type>&format=<pdf|png>`
//! - `POST /api/v1/labels/batch` with `{"ids": [..], "type": ".."}`

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/labels/batch", post(handlers::render_batch_labels))
        .route("/api/v1/labels/:id", get(handlers::render_label))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
