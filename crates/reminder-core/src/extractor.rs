//! The Extractor trait definition.

use async_trait::async_trait;

use crate::error::ExtractorError;
use crate::models::CreationMode;

/// Input handed to a language model for reminder extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionInput {
    /// Free text typed by the user.
    Text(String),
    /// A voice recording.
    Audio {
        data: Vec<u8>,
        /// MIME type reported by the client, if any.
        mime_type: Option<String>,
    },
}

impl ExtractionInput {
    /// The modality of this input.
    pub fn modality(&self) -> InputModality {
        match self {
            ExtractionInput::Text(_) => InputModality::Text,
            ExtractionInput::Audio { .. } => InputModality::Audio,
        }
    }
}

/// Whether the user typed or spoke the reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    Text,
    Audio,
}

impl InputModality {
    /// The creation mode recorded for reminders from this modality.
    pub fn creation_mode(&self) -> CreationMode {
        match self {
            InputModality::Text => CreationMode::AiText,
            InputModality::Audio => CreationMode::Voice,
        }
    }
}

/// A language-model backend that turns user input into raw reminder JSON.
///
/// Implementations only transport the prompt and return the model's text;
/// validation happens in [`crate::extraction`]. This trait is object-safe
/// and can be used with `Arc<dyn Extractor>`.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Send `input` with `prompt` to the model and return its raw reply.
    async fn extract(
        &self,
        input: &ExtractionInput,
        prompt: &str,
    ) -> Result<String, ExtractorError>;

    /// Get a human-readable name for this extractor.
    fn name(&self) -> &str;
}
