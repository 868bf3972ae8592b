//! Reminder status transitions and successor generation.
//!
//! Any status may be set from any other through an explicit update. Moving a
//! `pending` or `snoozed` reminder to `completed` is the one transition with a
//! side effect: if the reminder recurs, a successor draft is produced. A
//! reminder that is already `completed` never produces a second successor.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{Reminder, ReminderDraft, ReminderStatus};
use crate::queue::advance;
use crate::recurrence::next_for_rule;
use crate::rule::RecurrenceRule;
use crate::timestamp;

/// A partial update to a reminder.
///
/// Fields left as `None` are not touched. The nullable fields use a double
/// option: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReminderUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub extra_info: Option<Option<String>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub remind_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: Option<ReminderStatus>,
    #[serde(default, deserialize_with = "present")]
    pub recurring_rule: Option<Option<String>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt_vec")]
    pub recurrence_queue: Option<Vec<NaiveDateTime>>,
}

impl ReminderUpdate {
    /// An update that only changes the status.
    pub fn status(status: ReminderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Mark the reminder completed.
    pub fn complete() -> Self {
        Self::status(ReminderStatus::Completed)
    }

    /// Snooze the reminder until `until`.
    pub fn snooze(until: NaiveDateTime) -> Self {
        Self {
            status: Some(ReminderStatus::Snoozed),
            remind_at: Some(until),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Distinguishes an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Result of applying an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The reminder with the update applied.
    pub reminder: Reminder,
    /// The successor to insert, when this update completed a recurring reminder.
    pub successor: Option<ReminderDraft>,
    /// Update fields that were ignored.
    pub warnings: Vec<ValidationError>,
}

/// Apply `update` to `current`.
///
/// The successor is computed from the updated record, so a completion that
/// also moves `remind_at` or changes the rule recurs from the new values.
pub fn apply_update(current: &Reminder, update: &ReminderUpdate, now: NaiveDateTime) -> Transition {
    let mut reminder = current.clone();
    let mut warnings = Vec::new();

    if let Some(title) = &update.title {
        let title = title.trim();
        if title.is_empty() {
            warnings.push(ValidationError::Empty("title"));
        } else {
            reminder.title = title.to_string();
        }
    }

    if let Some(extra_info) = &update.extra_info {
        reminder.extra_info = extra_info.clone();
    }

    if let Some(remind_at) = update.remind_at {
        reminder.remind_at = remind_at;
    }

    match (&update.recurring_rule, &update.recurrence_queue) {
        (Some(None), _) => reminder.rule = None,
        (Some(Some(name)), queue) => {
            let queue = queue
                .clone()
                .unwrap_or_else(|| current.recurrence_queue().to_vec());
            match RecurrenceRule::parse(name, queue) {
                Ok(rule) => reminder.rule = rule,
                Err(err) => warnings.push(ValidationError::Rule(err)),
            }
        }
        (None, Some(queue)) => {
            if let Some(RecurrenceRule::Custom(existing)) = &mut reminder.rule {
                *existing = queue.clone();
            }
        }
        (None, None) => {}
    }

    if let Some(status) = update.status {
        reminder.status = status;
    }

    let successor = if current.status != ReminderStatus::Completed
        && reminder.status == ReminderStatus::Completed
    {
        complete(&reminder, now)
    } else {
        None
    };

    Transition {
        reminder,
        successor,
        warnings,
    }
}

/// Build the successor of a reminder that has just been completed.
///
/// - No rule: nothing.
/// - Custom rule: the next queued date, carrying the rest of the queue;
///   nothing once the queue is exhausted.
/// - Fixed rule: the next occurrence after the reminder's own `remind_at`.
///
/// The successor keeps the owner, title, rule, and creation mode, starts
/// `pending`, and is stamped with `now`.
pub fn complete(reminder: &Reminder, now: NaiveDateTime) -> Option<ReminderDraft> {
    let rule = reminder.rule.as_ref()?;
    if rule.is_exhausted() {
        debug!(id = %reminder.id, "Custom recurrence exhausted");
        return None;
    }

    let (remind_at, next_rule) = match rule {
        RecurrenceRule::Custom(queue) => {
            let (next, remaining) = advance(queue);
            (next?, RecurrenceRule::Custom(remaining))
        }
        other => (next_for_rule(reminder.remind_at, other), other.clone()),
    };

    Some(ReminderDraft {
        user_id: reminder.user_id.clone(),
        title: reminder.title.clone(),
        extra_info: None,
        remind_at,
        rule: Some(next_rule),
        status: ReminderStatus::Pending,
        creation_mode: reminder.creation_mode,
        created_at: now,
    })
}
