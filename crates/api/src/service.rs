//! Reminder operations behind the HTTP routes.

use std::sync::Arc;

use chrono::NaiveDateTime;
use database::{reminder, Database, ReminderSort, UpdateOutcome};
use reminder_core::manual::{self, ManualInput};
use reminder_core::{
    extraction, prompt, timestamp, ExtractionError, ExtractionInput, Extractor, Reminder,
    ReminderUpdate,
};
use tracing::{info, warn};

use crate::error::{ApiError, Result};

/// Owner used when a request carries an empty user id.
pub const DEFAULT_USER: &str = "default_user";

/// A create request, as read from the form.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub user_id: String,
    /// Client-declared mode; informational only.
    pub mode: Option<String>,
    pub text: Option<String>,
    /// Uploaded audio bytes and their reported MIME type.
    pub audio: Option<(Vec<u8>, Option<String>)>,
    pub title: Option<String>,
    pub remind_at: Option<String>,
    pub recurring_rule: Option<String>,
    pub recurrence_queue: Vec<String>,
    pub extra_info: Option<String>,
    /// The client's wall-clock time, used as "now" in the prompt.
    pub local_time: Option<String>,
}

impl CreateRequest {
    /// Manual entry skips the language model entirely.
    pub fn is_manual(&self) -> bool {
        filled(&self.title).is_some() && filled(&self.remind_at).is_some()
    }
}

/// Reminder service shared by all handlers.
#[derive(Clone)]
pub struct ReminderService {
    db: Database,
    extractor: Arc<dyn Extractor>,
    home_feed_limit: i64,
}

impl ReminderService {
    /// Create a new service.
    pub fn new(db: Database, extractor: Arc<dyn Extractor>, home_feed_limit: i64) -> Self {
        Self {
            db,
            extractor,
            home_feed_limit,
        }
    }

    /// Create a reminder from manual fields or through the language model.
    ///
    /// Nothing is stored when extraction fails.
    pub async fn create(&self, request: CreateRequest, now: NaiveDateTime) -> Result<Reminder> {
        let user_id = user_or_default(&request.user_id).to_string();

        let draft = if request.is_manual() {
            let input = ManualInput {
                title: request.title.unwrap_or_default(),
                remind_at: request.remind_at.unwrap_or_default(),
                recurring_rule: request.recurring_rule,
                recurrence_queue: request.recurrence_queue,
                extra_info: request.extra_info,
            };
            let (draft, warnings) = manual::build_draft(&user_id, &input, now);
            for warning in &warnings {
                warn!(user_id = %user_id, warning = %warning, "Adjusted manual reminder field");
            }
            draft
        } else {
            let input = match (request.audio, filled(&request.text)) {
                (Some((data, mime_type)), _) => ExtractionInput::Audio { data, mime_type },
                (None, Some(text)) => ExtractionInput::Text(text.to_string()),
                (None, None) => {
                    return Err(ApiError::BadRequest(
                        "provide title and remind_at, text, or an audio file".to_string(),
                    ))
                }
            };

            let prompt_now = request
                .local_time
                .as_deref()
                .and_then(timestamp::parse)
                .unwrap_or(now);
            let prompt = prompt::extraction_prompt(prompt_now);

            info!(
                user_id = %user_id,
                extractor = self.extractor.name(),
                declared_mode = request.mode.as_deref().unwrap_or(""),
                "Extracting reminder"
            );

            let raw = self
                .extractor
                .extract(&input, &prompt)
                .await
                .map_err(ExtractionError::from)?;

            extraction::validate(&raw, input.modality(), &user_id, now).map_err(|err| {
                warn!(user_id = %user_id, error = %err, "Rejected extraction payload");
                err
            })?
        };

        let stored = reminder::insert_reminder(self.db.pool(), draft).await?;

        info!(
            id = %stored.id,
            user_id = %stored.user_id,
            mode = stored.creation_mode.as_str(),
            rule = stored.rule_name().unwrap_or("none"),
            "Created reminder"
        );

        Ok(stored)
    }

    /// Most recently created reminders, for the home feed.
    pub async fn list_recent(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let reminders = reminder::list_reminders(
            self.db.pool(),
            user_or_default(user_id),
            ReminderSort::CreatedAt,
            Some(self.home_feed_limit),
        )
        .await?;
        Ok(reminders)
    }

    /// Every reminder of a user, latest scheduled time first.
    pub async fn list_history(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let reminders = reminder::list_reminders(
            self.db.pool(),
            user_or_default(user_id),
            ReminderSort::RemindAt,
            None,
        )
        .await?;
        Ok(reminders)
    }

    /// Apply a partial update; completing a recurring reminder creates its successor.
    pub async fn update(
        &self,
        id: &str,
        update: &ReminderUpdate,
        now: NaiveDateTime,
    ) -> Result<UpdateOutcome> {
        Ok(reminder::update_reminder(self.db.pool(), id, update, now).await?)
    }

    /// Delete a single reminder.
    pub async fn delete(&self, id: &str) -> Result<()> {
        reminder::delete_reminder(self.db.pool(), id).await?;
        info!(id = %id, "Deleted reminder");
        Ok(())
    }
}

fn user_or_default(user_id: &str) -> &str {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        DEFAULT_USER
    } else {
        trimmed
    }
}

fn filled(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_or_default() {
        assert_eq!(user_or_default(""), DEFAULT_USER);
        assert_eq!(user_or_default("  "), DEFAULT_USER);
        assert_eq!(user_or_default(" alice "), "alice");
    }

    #[test]
    fn test_is_manual_needs_both_fields() {
        let mut request = CreateRequest {
            title: Some("Dentist".to_string()),
            ..CreateRequest::default()
        };
        assert!(!request.is_manual());

        request.remind_at = Some("  ".to_string());
        assert!(!request.is_manual());

        request.remind_at = Some("2024-01-15T09:00".to_string());
        assert!(request.is_manual());
    }
}
