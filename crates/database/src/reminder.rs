//! Reminder persistence.

use chrono::NaiveDateTime;
use reminder_core::lifecycle::{self, ReminderUpdate};
use reminder_core::{RecurrenceRule, Reminder, ReminderDraft, ReminderStatus};
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::ReminderRecord;

/// Sort order for per-user listings. Both orders are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderSort {
    /// Most recently created first.
    CreatedAt,
    /// Latest scheduled time first.
    RemindAt,
}

/// Result of a stored update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The reminder as committed.
    pub reminder: Reminder,
    /// The successor inserted by a recurring completion.
    pub successor: Option<Reminder>,
}

/// Insert a draft and return the stored reminder with its new identifier.
pub async fn insert_reminder<'e, E>(executor: E, draft: ReminderDraft) -> Result<Reminder>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = Uuid::new_v4().to_string();
    let queue = draft
        .rule
        .as_ref()
        .map(|rule| rule.queue().to_vec())
        .unwrap_or_default();

    sqlx::query(
        r#"
        INSERT INTO reminders (
            id, user_id, title, extra_info, remind_at, recurring_rule,
            recurrence_queue, status, creation_mode, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&draft.user_id)
    .bind(&draft.title)
    .bind(&draft.extra_info)
    .bind(draft.remind_at)
    .bind(draft.rule.as_ref().map(RecurrenceRule::name))
    .bind(Json(queue))
    .bind(draft.status.as_str())
    .bind(draft.creation_mode.as_str())
    .bind(draft.created_at)
    .execute(executor)
    .await?;

    debug!(id = %id, user_id = %draft.user_id, "Inserted reminder");

    Ok(draft.into_reminder(id))
}

/// Find a reminder by ID.
pub async fn find_reminder<'e, E>(executor: E, id: &str) -> Result<Option<Reminder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let record = sqlx::query_as::<_, ReminderRecord>(
        r#"
        SELECT id, user_id, title, extra_info, remind_at, recurring_rule,
               recurrence_queue, status, creation_mode, created_at
        FROM reminders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(record.map(Reminder::from))
}

/// Get a reminder by ID.
pub async fn get_reminder(pool: &SqlitePool, id: &str) -> Result<Reminder> {
    find_reminder(pool, id).await?.ok_or_else(|| not_found(id))
}

/// List a user's reminders, newest first by `sort`.
///
/// `limit` of `None` returns every reminder.
pub async fn list_reminders(
    pool: &SqlitePool,
    user_id: &str,
    sort: ReminderSort,
    limit: Option<i64>,
) -> Result<Vec<Reminder>> {
    let sql = match sort {
        ReminderSort::CreatedAt => {
            r#"
            SELECT id, user_id, title, extra_info, remind_at, recurring_rule,
                   recurrence_queue, status, creation_mode, created_at
            FROM reminders
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#
        }
        ReminderSort::RemindAt => {
            r#"
            SELECT id, user_id, title, extra_info, remind_at, recurring_rule,
                   recurrence_queue, status, creation_mode, created_at
            FROM reminders
            WHERE user_id = ?
            ORDER BY remind_at DESC, rowid DESC
            LIMIT ?
            "#
        }
    };

    // SQLite treats a negative LIMIT as unbounded.
    let rows = sqlx::query_as::<_, ReminderRecord>(sql)
        .bind(user_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Reminder::from).collect())
}

/// Write the mutable fields of `reminder`, provided its stored status is
/// still `expected_status`.
///
/// Returns `false` when the row is missing or its status changed since it
/// was read.
pub async fn update_fields<'e, E>(
    executor: E,
    reminder: &Reminder,
    expected_status: ReminderStatus,
) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE reminders
        SET title = ?, extra_info = ?, remind_at = ?, recurring_rule = ?,
            recurrence_queue = ?, status = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(&reminder.title)
    .bind(&reminder.extra_info)
    .bind(reminder.remind_at)
    .bind(reminder.rule_name())
    .bind(Json(reminder.recurrence_queue().to_vec()))
    .bind(reminder.status.as_str())
    .bind(&reminder.id)
    .bind(expected_status.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Apply a partial update, inserting a successor when it completes a
/// recurring reminder.
///
/// The read, the update, and the successor insert run in one
/// `BEGIN IMMEDIATE` transaction, in that order, so the successor is always
/// computed from the committed state and a failed insert rolls the status change back
/// with it. Concurrent writers queue on the write lock; one that gives up
/// waiting gets [`DatabaseError::Conflict`].
pub async fn update_reminder(
    pool: &SqlitePool,
    id: &str,
    update: &ReminderUpdate,
    now: NaiveDateTime,
) -> Result<UpdateOutcome> {
    let outcome = apply_in_transaction(pool, id, update, now)
        .await
        .map_err(|err| match err {
            DatabaseError::Sqlx(ref source) if is_busy(source) => {
                warn!(id = %id, error = %source, "Reminder update lost the write lock");
                conflict(id)
            }
            other => other,
        })?;

    if let Some(ref next) = outcome.successor {
        info!(
            id = %id,
            successor_id = %next.id,
            remind_at = %next.remind_at,
            rule = next.rule_name().unwrap_or_default(),
            "Recurring rule triggered, created successor"
        );
    }

    Ok(outcome)
}

async fn apply_in_transaction(
    pool: &SqlitePool,
    id: &str,
    update: &ReminderUpdate,
    now: NaiveDateTime,
) -> Result<UpdateOutcome> {
    // Take the write lock before reading so the status check and the write
    // see the same snapshot.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let current = find_reminder(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let transition = lifecycle::apply_update(&current, update, now);
    for warning in &transition.warnings {
        warn!(id = %id, warning = %warning, "Ignored invalid update field");
    }

    if !update_fields(&mut *tx, &transition.reminder, current.status).await? {
        return Err(conflict(id));
    }

    let successor = match transition.successor {
        Some(draft) => Some(insert_reminder(&mut *tx, draft).await?),
        None => None,
    };

    tx.commit().await?;

    Ok(UpdateOutcome {
        reminder: transition.reminder,
        successor,
    })
}

/// Delete a reminder. Other reminders in the same series are untouched.
pub async fn delete_reminder(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    Ok(())
}

/// `SQLITE_BUSY` in any of its extended forms.
fn is_busy(err: &sqlx::Error) -> bool {
    const SQLITE_BUSY: i32 = 5;

    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == SQLITE_BUSY)
}

fn conflict(id: &str) -> DatabaseError {
    DatabaseError::Conflict {
        entity: "Reminder",
        id: id.to_string(),
    }
}

fn not_found(id: &str) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "Reminder",
        id: id.to_string(),
    }
}
