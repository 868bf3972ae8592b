//! Validation of language-model extraction payloads.
//!
//! The model is asked for a JSON object shaped like [`RawExtraction`]. Its
//! reply is untrusted: anything that is not JSON, lacks a title or a
//! parseable `remind_at`, names an unknown rule, or asks for a custom rule
//! without dates is rejected with an [`ExtractionError`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::extractor::InputModality;
use crate::models::ReminderDraft;
use crate::rule::RecurrenceRule;
use crate::timestamp;

/// The payload shape requested from the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtraction {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub remind_at: Option<String>,
    #[serde(default)]
    pub recurring_rule: Option<String>,
    #[serde(default)]
    pub recurrence_queue: Option<Vec<String>>,
    #[serde(default)]
    pub extra_info: Option<String>,
}

/// Validate a raw model reply and normalize it into a draft for `user_id`.
pub fn validate(
    raw: &str,
    modality: InputModality,
    user_id: &str,
    now: NaiveDateTime,
) -> Result<ReminderDraft, ExtractionError> {
    let payload: RawExtraction = serde_json::from_str(strip_code_fences(raw))?;
    normalize(payload, modality, user_id, now)
}

/// Normalize an already-decoded payload.
pub fn normalize(
    payload: RawExtraction,
    modality: InputModality,
    user_id: &str,
    now: NaiveDateTime,
) -> Result<ReminderDraft, ExtractionError> {
    let title = non_blank(payload.title).ok_or(ExtractionError::MissingField("title"))?;

    let raw_remind_at =
        non_blank(payload.remind_at).ok_or(ExtractionError::MissingField("remind_at"))?;
    let remind_at = parse_field("remind_at", &raw_remind_at)?;

    let rule_name = payload.recurring_rule.unwrap_or_default();
    let queue = if rule_name.trim().eq_ignore_ascii_case(RecurrenceRule::CUSTOM) {
        payload
            .recurrence_queue
            .unwrap_or_default()
            .iter()
            .map(|entry| parse_field("recurrence_queue", entry))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };
    let rule = RecurrenceRule::parse(&rule_name, queue)?;

    Ok(
        ReminderDraft::new(user_id, title, remind_at, modality.creation_mode(), now)
            .with_rule(rule)
            .with_extra_info(non_blank(payload.extra_info)),
    )
}

/// Reshape a draft as the payload the model would have returned.
pub fn to_payload(draft: &ReminderDraft) -> RawExtraction {
    let queue = draft
        .rule
        .as_ref()
        .map(|rule| rule.queue().iter().map(timestamp::format).collect());

    RawExtraction {
        title: Some(draft.title.clone()),
        remind_at: Some(timestamp::format(&draft.remind_at)),
        recurring_rule: draft.rule.as_ref().map(|rule| rule.name().to_string()),
        recurrence_queue: queue,
        extra_info: draft.extra_info.clone(),
    }
}

/// Remove Markdown code fences and any prose around the JSON object.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_field(field: &'static str, value: &str) -> Result<NaiveDateTime, ExtractionError> {
    timestamp::parse(value).ok_or_else(|| ExtractionError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}
