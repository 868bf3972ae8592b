//! Error types for reminder operations.

use thiserror::Error;

/// Errors returned by a language-model backend.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The backend is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered but produced no usable text.
    #[error("empty response from extractor")]
    EmptyResponse,

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors produced while turning a language-model payload into a draft.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extractor call itself failed.
    #[error("extraction failed: {0}")]
    Extractor(#[from] ExtractorError),

    /// The payload was not a JSON object of the expected shape.
    #[error("payload is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    /// A required field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A timestamp field did not parse.
    #[error("invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// The recurrence rule was rejected.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Errors from parsing a recurrence rule name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The name is not one of the known cadences.
    #[error("unknown recurring rule: {0:?}")]
    Unknown(String),

    /// A `custom` rule arrived without any queued dates.
    #[error("custom recurring rule requires a non-empty recurrence_queue")]
    EmptyCustomQueue,
}

/// Problems found in manual input.
///
/// These never reject a request; the manual path substitutes a default and
/// reports what it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `remind_at` did not parse; the current time was used instead.
    #[error("unparseable remind_at {0:?}, using current time")]
    RemindAt(String),

    /// The rule was dropped and the reminder stored as non-recurring.
    #[error("dropped recurring rule: {0}")]
    Rule(RuleError),

    /// A queued custom date did not parse and was skipped.
    #[error("skipped unparseable queue entry {0:?}")]
    QueueEntry(String),

    /// A blank value where text is required; the field was left unchanged.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}
