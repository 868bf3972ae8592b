//! HTTP API for the personal reminders service.
//!
//! Routes are served with axum over a [`ReminderService`], which combines
//! the SQLite repository from `database` with an injected
//! [`reminder_core::Extractor`].

pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;
pub use service::{CreateRequest, ReminderService};
pub use state::AppState;

/// Build the application with middleware applied.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    routes::router()
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
