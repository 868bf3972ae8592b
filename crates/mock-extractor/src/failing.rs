//! Failing extractor implementation - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};

use reminder_core::{async_trait, ExtractionInput, Extractor, ExtractorError};

/// An extractor whose backend is always down.
///
/// Useful for checking that nothing is stored when extraction fails.
#[derive(Debug)]
pub struct FailingExtractor {
    status: u16,
    message: String,
    calls: AtomicUsize,
}

impl FailingExtractor {
    /// Fail with a 503 API error.
    pub fn new() -> Self {
        Self::with_status(503, "model overloaded")
    }

    /// Fail with the given API status and message.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for FailingExtractor {
    async fn extract(
        &self,
        _input: &ExtractionInput,
        _prompt: &str,
    ) -> Result<String, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ExtractorError::Api {
            status: self.status,
            message: self.message.clone(),
        })
    }

    fn name(&self) -> &str {
        "FailingExtractor"
    }
}
