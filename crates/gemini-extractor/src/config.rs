//! Configuration for GeminiExtractor.

use reminder_core::ExtractorError;
use std::env;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// MIME type assumed for uploads that do not report one.
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/webm";

/// Configuration for GeminiExtractor.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// MIME type for audio uploads without one.
    pub audio_mime_type: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.7),
            audio_mime_type: DEFAULT_AUDIO_MIME_TYPE.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-3-flash-preview)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 0.7)
    /// - `GEMINI_AUDIO_MIME_TYPE` - Fallback audio MIME type (default: audio/webm)
    pub fn from_env() -> Result<Self, ExtractorError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExtractorError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = match env::var("GEMINI_TEMPERATURE") {
            Ok(value) => Some(value.parse().map_err(|_| {
                ExtractorError::Configuration(format!("invalid GEMINI_TEMPERATURE: {}", value))
            })?),
            Err(_) => Some(0.7),
        };

        let audio_mime_type = env::var("GEMINI_AUDIO_MIME_TYPE")
            .unwrap_or_else(|_| DEFAULT_AUDIO_MIME_TYPE.to_string());

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            audio_mime_type,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the fallback audio MIME type.
    pub fn audio_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.config.audio_mime_type = mime_type.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
