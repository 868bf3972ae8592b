//! Reminder records and drafts.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::rule::RecurrenceRule;

/// Status of a single reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Completed,
    Snoozed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Completed => "completed",
            ReminderStatus::Snoozed => "snoozed",
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReminderStatus::Pending),
            "completed" => Ok(ReminderStatus::Completed),
            "snoozed" => Ok(ReminderStatus::Snoozed),
            other => Err(format!("unknown reminder status: {other:?}")),
        }
    }
}

/// How a reminder was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationMode {
    #[default]
    Manual,
    Voice,
    AiText,
}

impl CreationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMode::Manual => "manual",
            CreationMode::Voice => "voice",
            CreationMode::AiText => "ai_text",
        }
    }
}

impl fmt::Display for CreationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(CreationMode::Manual),
            "voice" => Ok(CreationMode::Voice),
            "ai_text" => Ok(CreationMode::AiText),
            other => Err(format!("unknown creation mode: {other:?}")),
        }
    }
}

/// A persisted reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Opaque identifier assigned by storage.
    pub id: String,
    /// Opaque owner identifier.
    pub user_id: String,
    pub title: String,
    pub extra_info: Option<String>,
    /// Scheduled time, naive local.
    pub remind_at: NaiveDateTime,
    /// Recurrence, if any.
    pub rule: Option<RecurrenceRule>,
    pub status: ReminderStatus,
    pub creation_mode: CreationMode,
    /// Set once at insert.
    pub created_at: NaiveDateTime,
}

impl Reminder {
    /// Wire name of the recurrence rule.
    pub fn rule_name(&self) -> Option<&str> {
        self.rule.as_ref().map(RecurrenceRule::name)
    }

    /// Pending custom dates; empty unless the rule is custom.
    pub fn recurrence_queue(&self) -> &[NaiveDateTime] {
        self.rule.as_ref().map(RecurrenceRule::queue).unwrap_or(&[])
    }
}

/// Everything needed to insert a reminder, minus its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    pub user_id: String,
    pub title: String,
    pub extra_info: Option<String>,
    pub remind_at: NaiveDateTime,
    pub rule: Option<RecurrenceRule>,
    pub status: ReminderStatus,
    pub creation_mode: CreationMode,
    pub created_at: NaiveDateTime,
}

impl ReminderDraft {
    /// A pending, non-recurring draft.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        remind_at: NaiveDateTime,
        creation_mode: CreationMode,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            extra_info: None,
            remind_at,
            rule: None,
            status: ReminderStatus::Pending,
            creation_mode,
            created_at,
        }
    }

    /// Set the recurrence rule.
    pub fn with_rule(mut self, rule: Option<RecurrenceRule>) -> Self {
        self.rule = rule;
        self
    }

    /// Set the extra info.
    pub fn with_extra_info(mut self, extra_info: Option<String>) -> Self {
        self.extra_info = extra_info;
        self
    }

    /// Attach the identifier storage assigned.
    pub fn into_reminder(self, id: impl Into<String>) -> Reminder {
        Reminder {
            id: id.into(),
            user_id: self.user_id,
            title: self.title,
            extra_info: self.extra_info,
            remind_at: self.remind_at,
            rule: self.rule,
            status: self.status,
            creation_mode: self.creation_mode,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Frequency;
    use chrono::NaiveDate;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReminderStatus::Pending,
            ReminderStatus::Completed,
            ReminderStatus::Snoozed,
        ] {
            assert_eq!(status.as_str().parse::<ReminderStatus>().unwrap(), status);
        }
        assert!("done".parse::<ReminderStatus>().is_err());
    }

    #[test]
    fn test_creation_mode_serde() {
        assert_eq!(
            serde_json::to_string(&CreationMode::AiText).unwrap(),
            "\"ai_text\""
        );
        assert_eq!("voice".parse::<CreationMode>().unwrap(), CreationMode::Voice);
    }

    #[test]
    fn test_draft_into_reminder() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let reminder = ReminderDraft::new("user-1", "Water plants", at, CreationMode::Manual, at)
            .with_rule(Some(RecurrenceRule::Fixed(Frequency::Weekly)))
            .into_reminder("abc");

        assert_eq!(reminder.id, "abc");
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.rule_name(), Some("weekly"));
        assert!(reminder.recurrence_queue().is_empty());
    }
}
