//! Reminders API server.

use std::sync::Arc;

use database::Database;
use gemini_extractor::GeminiExtractor;
use reminders_api::{app, AppState, Config, ReminderService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting reminders API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Language model backend
    let extractor = GeminiExtractor::from_env()?;
    info!(model = %extractor.config().model, "Using Gemini extractor");

    let service = ReminderService::new(db, Arc::new(extractor), config.home_feed_limit);
    let app = app(AppState::new(service), config.max_upload_bytes);

    // Start server
    info!(addr = %config.addr, "Reminders API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
