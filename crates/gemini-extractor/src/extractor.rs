//! GeminiExtractor implementation using the Gemini REST API.

use base64::Engine;
use reminder_core::{async_trait, ExtractionInput, Extractor, ExtractorError};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::config::GeminiConfig;

/// An extractor that sends reminder input to Google's Gemini models.
///
/// Text is appended to the prompt and the model is asked for JSON output.
/// Audio is sent inline (base64) ahead of the prompt in the same turn.
pub struct GeminiExtractor {
    client: Client,
    config: GeminiConfig,
}

impl GeminiExtractor {
    /// Create a new GeminiExtractor with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ExtractorError> {
        if config.api_key.trim().is_empty() {
            return Err(ExtractorError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ExtractorError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("GeminiExtractor initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiExtractor from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, ExtractorError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build the request body for one extraction call.
    pub(crate) fn build_request(
        &self,
        input: &ExtractionInput,
        prompt: &str,
    ) -> GenerateContentRequest {
        match input {
            ExtractionInput::Text(text) => GenerateContentRequest {
                contents: vec![Content::user(vec![Part::text(format!(
                    "{}\nInput: {}",
                    prompt, text
                ))])],
                generation_config: Some(GenerationConfig {
                    temperature: self.config.temperature,
                    response_mime_type: Some("application/json".to_string()),
                }),
            },
            ExtractionInput::Audio { data, mime_type } => {
                let mime_type = mime_type
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(self.config.audio_mime_type.as_str());
                let encoded = base64::engine::general_purpose::STANDARD.encode(data);

                // Audio goes first so the prompt reads as an instruction about it.
                GenerateContentRequest {
                    contents: vec![Content::user(vec![
                        Part::inline(mime_type, encoded),
                        Part::text(prompt),
                    ])],
                    generation_config: Some(GenerationConfig {
                        temperature: self.config.temperature,
                        response_mime_type: None,
                    }),
                }
            }
        }
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ExtractorError> {
        let url = self.config.endpoint();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ExtractorError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.describe(),
                Err(_) => error_text,
            };

            return Err(ExtractorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| {
                ExtractorError::InvalidResponse(format!("Failed to parse response: {}", e))
            })
    }
}

#[async_trait]
impl Extractor for GeminiExtractor {
    async fn extract(
        &self,
        input: &ExtractionInput,
        prompt: &str,
    ) -> Result<String, ExtractorError> {
        let request = self.build_request(input, prompt);

        match input {
            ExtractionInput::Text(text) => {
                debug!(model = %self.config.model, chars = text.len(), "Sending text to Gemini");
            }
            ExtractionInput::Audio { data, .. } => {
                debug!(
                    model = %self.config.model,
                    bytes = data.len(),
                    "Sending audio inline to Gemini"
                );
            }
        }

        let response = self.generate_content(&request).await?;

        match response.text() {
            Some(text) => {
                debug!(chars = text.len(), "Received response from Gemini");
                Ok(text)
            }
            None => {
                let block_reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|feedback| feedback.block_reason.as_deref())
                    .unwrap_or("");
                let finish_reason = response
                    .candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.as_deref())
                    .unwrap_or("");
                warn!(block_reason, finish_reason, "Gemini returned no text");
                Err(ExtractorError::EmptyResponse)
            }
        }
    }

    fn name(&self) -> &str {
        "GeminiExtractor"
    }
}
