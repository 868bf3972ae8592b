//! Mock extractor implementations for reminder creation tests.
//!
//! This crate provides mock implementations of the `Extractor` trait:
//! - `ScriptedExtractor` - Returns canned replies and records every call
//! - `FailingExtractor` - Always fails with an API error
//!
//! For production extraction, use the `gemini-extractor` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_extractor::{ExtractionInput, Extractor, ScriptedExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_extractor::ExtractorError> {
//!     let extractor = ScriptedExtractor::new(r#"{"title": "Gym"}"#);
//!
//!     let input = ExtractionInput::Text("gym tomorrow".to_string());
//!     let raw = extractor.extract(&input, "prompt").await?;
//!     assert_eq!(raw, r#"{"title": "Gym"}"#);
//!     Ok(())
//! }
//! ```

mod failing;
mod scripted;

// Re-export reminder-core types for convenience
pub use reminder_core::{async_trait, ExtractionInput, Extractor, ExtractorError};

pub use failing::FailingExtractor;
pub use scripted::{RecordedCall, ScriptedExtractor};
