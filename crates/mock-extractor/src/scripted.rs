//! Scripted extractor implementation - replies with canned payloads.

use std::collections::VecDeque;

use reminder_core::{async_trait, ExtractionInput, Extractor, ExtractorError};
use tokio::sync::Mutex;

/// A call seen by a [`ScriptedExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub input: ExtractionInput,
    pub prompt: String,
}

/// An extractor that returns scripted replies in order.
///
/// Once the script runs out, the last reply is repeated. Every call is
/// recorded so tests can assert on the prompt and input that were sent.
#[derive(Debug, Default)]
pub struct ScriptedExtractor {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExtractor {
    /// Create an extractor that always returns `reply`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_extractor::ScriptedExtractor;
    ///
    /// let extractor = ScriptedExtractor::new(r#"{"title": "Gym", "remind_at": "2024-01-15T07:00:00"}"#);
    /// ```
    pub fn new(reply: impl Into<String>) -> Self {
        Self::with_replies([reply])
    }

    /// Create an extractor that returns `replies` one per call.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(
        &self,
        input: &ExtractionInput,
        prompt: &str,
    ) -> Result<String, ExtractorError> {
        self.calls.lock().await.push(RecordedCall {
            input: input.clone(),
            prompt: prompt.to_string(),
        });

        let mut last = self.last.lock().await;
        if let Some(reply) = self.replies.lock().await.pop_front() {
            *last = Some(reply);
        }

        last.clone().ok_or(ExtractorError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "ScriptedExtractor"
    }
}
