//! Route handlers for the reminders API.

pub mod health;
pub mod reminders;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Reminders
        .route("/reminders/create", post(reminders::create))
        .route("/reminders/home/:user_id", get(reminders::home_feed))
        .route("/reminders/history/:user_id", get(reminders::history_feed))
        .route(
            "/reminders/:id",
            put(reminders::update).delete(reminders::delete),
        )
}
