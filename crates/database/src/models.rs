//! Database models.

use chrono::NaiveDateTime;
use reminder_core::{RecurrenceRule, Reminder};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::warn;

/// A row of the `reminders` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReminderRecord {
    /// UUID assigned at insert.
    pub id: String,
    /// Opaque owner identifier.
    pub user_id: String,
    /// Reminder text.
    pub title: String,
    /// Optional notes.
    pub extra_info: Option<String>,
    /// Scheduled time (naive local).
    pub remind_at: NaiveDateTime,
    /// Cadence name, `custom`, or NULL.
    pub recurring_rule: Option<String>,
    /// Pending custom dates as a JSON array.
    pub recurrence_queue: Json<Vec<NaiveDateTime>>,
    /// `pending`, `completed` or `snoozed`.
    pub status: String,
    /// `manual`, `voice` or `ai_text`.
    pub creation_mode: String,
    /// Insert timestamp.
    pub created_at: NaiveDateTime,
}

impl From<ReminderRecord> for Reminder {
    fn from(record: ReminderRecord) -> Self {
        let status = record.status.parse().unwrap_or_else(|err| {
            warn!(id = %record.id, error = %err, "Stored status unreadable, treating as pending");
            Default::default()
        });
        let creation_mode = record.creation_mode.parse().unwrap_or_else(|err| {
            warn!(
                id = %record.id,
                error = %err,
                "Stored creation mode unreadable, treating as manual"
            );
            Default::default()
        });
        let rule = RecurrenceRule::from_stored(
            record.recurring_rule.as_deref(),
            record.recurrence_queue.0,
        );

        Reminder {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            extra_info: record.extra_info,
            remind_at: record.remind_at,
            rule,
            status,
            creation_mode,
            created_at: record.created_at,
        }
    }
}
