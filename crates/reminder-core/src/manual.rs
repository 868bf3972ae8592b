//! Drafts from manually entered reminders.
//!
//! Manual input is never rejected for shape problems. Each bad field is
//! replaced by a default and reported as a [`ValidationError`]:
//!
//! | Problem | Result |
//! |---------|--------|
//! | `remind_at` does not parse | current time |
//! | unknown rule, or `custom` with no usable dates | non-recurring |
//! | unparseable queue entry | entry skipped |

use chrono::NaiveDateTime;

use crate::error::ValidationError;
use crate::models::{CreationMode, ReminderDraft};
use crate::rule::RecurrenceRule;
use crate::timestamp;

/// Fields from the manual entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualInput {
    pub title: String,
    pub remind_at: String,
    pub recurring_rule: Option<String>,
    pub recurrence_queue: Vec<String>,
    pub extra_info: Option<String>,
}

/// Build a pending draft from manual input, substituting defaults for bad
/// fields.
pub fn build_draft(
    user_id: &str,
    input: &ManualInput,
    now: NaiveDateTime,
) -> (ReminderDraft, Vec<ValidationError>) {
    let mut warnings = Vec::new();

    let remind_at = timestamp::parse(&input.remind_at).unwrap_or_else(|| {
        warnings.push(ValidationError::RemindAt(input.remind_at.clone()));
        now
    });

    let queue = input
        .recurrence_queue
        .iter()
        .filter_map(|entry| {
            let parsed = timestamp::parse(entry);
            if parsed.is_none() {
                warnings.push(ValidationError::QueueEntry(entry.clone()));
            }
            parsed
        })
        .collect();

    let rule = match input.recurring_rule.as_deref() {
        Some(name) => RecurrenceRule::parse(name, queue).unwrap_or_else(|err| {
            warnings.push(ValidationError::Rule(err));
            None
        }),
        None => None,
    };

    let extra_info = input
        .extra_info
        .as_deref()
        .map(str::trim)
        .filter(|info| !info.is_empty())
        .map(str::to_string);

    let draft = ReminderDraft::new(
        user_id,
        input.title.trim(),
        remind_at,
        CreationMode::Manual,
        now,
    )
    .with_rule(rule)
    .with_extra_info(extra_info);

    (draft, warnings)
}
