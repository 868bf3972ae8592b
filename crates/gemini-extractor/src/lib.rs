//! Google Gemini-based reminder extractor.
//!
//! This crate implements [`reminder_core::Extractor`] over the Gemini
//! `generateContent` REST API. Typed text is sent with a JSON response
//! format; voice recordings are sent inline as base64.
//!
//! # Usage
//!
//! ```rust,no_run
//! use chrono::Local;
//! use gemini_extractor::{ExtractionInput, Extractor, GeminiExtractor};
//! use reminder_core::prompt::extraction_prompt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = GeminiExtractor::from_env()?;
//!     let prompt = extraction_prompt(Local::now().naive_local());
//!     let raw = extractor
//!         .extract(&ExtractionInput::Text("gym every monday at 7".into()), &prompt)
//!         .await?;
//!     println!("{raw}");
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod extractor;

pub use config::GeminiConfig;
pub use extractor::GeminiExtractor;

// Re-export reminder-core types for convenience
pub use reminder_core::{async_trait, ExtractionInput, Extractor, ExtractorError};
