//! SQLite persistence layer for reminders.
//!
//! This crate stores [`reminder_core::Reminder`] records using SQLx with
//! SQLite, and runs status updates together with successor creation inside a
//! single transaction.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use database::{reminder, Database};
//! use reminder_core::{CreationMode, ReminderDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:reminders.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a reminder
//!     let now = Local::now().naive_local();
//!     let draft = ReminderDraft::new("user-1", "Water plants", now, CreationMode::Manual, now);
//!     let stored = reminder::insert_reminder(db.pool(), draft).await?;
//!     println!("created {}", stored.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod reminder;

pub use error::{DatabaseError, Result};
pub use models::ReminderRecord;
pub use reminder::{ReminderSort, UpdateOutcome};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/reminders.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database, so
    /// in-memory databases should use a pool size of 1.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use reminder_core::{
        CreationMode, Frequency, RecurrenceRule, ReminderDraft, ReminderStatus, ReminderUpdate,
    };

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn draft(title: &str, remind_at: NaiveDateTime, rule: Option<RecurrenceRule>) -> ReminderDraft {
        ReminderDraft::new("user-1", title, remind_at, CreationMode::Manual, at(1, 1, 8))
            .with_rule(rule)
    }

    #[tokio::test]
    async fn test_reminder_crud() {
        let db = test_db().await;

        // Create
        let created = reminder::insert_reminder(
            db.pool(),
            draft("Dentist", at(1, 15, 9), None).with_extra_info(Some("Bring card".into())),
        )
        .await
        .unwrap();
        assert!(!created.id.is_empty());

        // Read
        let fetched = reminder::get_reminder(db.pool(), &created.id).await.unwrap();
        assert_eq!(fetched, created);

        // Update
        let update = ReminderUpdate {
            title: Some("Dentist (moved)".to_string()),
            ..ReminderUpdate::default()
        };
        let outcome = reminder::update_reminder(db.pool(), &created.id, &update, at(1, 2, 8))
            .await
            .unwrap();
        assert_eq!(outcome.reminder.title, "Dentist (moved)");
        assert_eq!(outcome.reminder.extra_info.as_deref(), Some("Bring card"));
        assert!(outcome.successor.is_none());

        // Delete
        reminder::delete_reminder(db.pool(), &created.id).await.unwrap();
        let result = reminder::get_reminder(db.pool(), &created.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = reminder::delete_reminder(db.pool(), &created.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_custom_queue_round_trips() {
        let db = test_db().await;
        let rule = RecurrenceRule::Custom(vec![at(2, 1, 7), at(2, 3, 7)]);

        let created = reminder::insert_reminder(
            db.pool(),
            draft("Stretch", at(1, 30, 7), Some(rule.clone())),
        )
        .await
        .unwrap();
        let fetched = reminder::get_reminder(db.pool(), &created.id).await.unwrap();

        assert_eq!(fetched.rule, Some(rule));
    }

    #[tokio::test]
    async fn test_completion_spawns_successor_once() {
        let db = test_db().await;
        let created = reminder::insert_reminder(
            db.pool(),
            draft("Recycling", at(1, 15, 9), Some(RecurrenceRule::Fixed(Frequency::Weekly))),
        )
        .await
        .unwrap();

        let complete = ReminderUpdate::complete();
        let outcome = reminder::update_reminder(db.pool(), &created.id, &complete, at(1, 16, 8))
            .await
            .unwrap();
        assert_eq!(outcome.reminder.status, ReminderStatus::Completed);

        let successor = outcome.successor.unwrap();
        assert_eq!(successor.remind_at, at(1, 22, 9));
        assert_eq!(successor.status, ReminderStatus::Pending);
        assert_eq!(successor.created_at, at(1, 16, 8));
        assert_eq!(
            reminder::get_reminder(db.pool(), &successor.id).await.unwrap(),
            successor
        );

        // Completing again is a no-op for recurrence.
        let again = reminder::update_reminder(db.pool(), &created.id, &complete, at(1, 16, 9))
            .await
            .unwrap();
        assert!(again.successor.is_none());

        let all = reminder::list_reminders(db.pool(), "user-1", ReminderSort::CreatedAt, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_completions_spawn_one_successor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.db");
        let url = format!("sqlite:{}?mode=rwc", path.display());
        let db = Database::connect_with_pool_size(&url, 8).await.unwrap();
        db.migrate().await.unwrap();

        for i in 0..10 {
            let rule = RecurrenceRule::Fixed(Frequency::Daily);
            let chore = draft(&format!("Chore {i}"), at(1, 15, 9), Some(rule));
            let created = reminder::insert_reminder(db.pool(), chore).await.unwrap();

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pool = db.pool().clone();
                    let id = created.id.clone();
                    tokio::spawn(async move {
                        let complete = ReminderUpdate::complete();
                        reminder::update_reminder(&pool, &id, &complete, at(1, 15, 10)).await
                    })
                })
                .collect();

            let mut successors = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(outcome) => {
                        assert_eq!(outcome.reminder.status, ReminderStatus::Completed);
                        successors += usize::from(outcome.successor.is_some());
                    }
                    Err(DatabaseError::Conflict { id, .. }) => assert_eq!(id, created.id),
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            assert_eq!(successors, 1, "reminder {i}");
        }

        let all = reminder::list_reminders(db.pool(), "user-1", ReminderSort::CreatedAt, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 20);
        db.close().await;
    }

    #[tokio::test]
    async fn test_update_missing_reminder() {
        let db = test_db().await;
        let complete = ReminderUpdate::complete();
        let result = reminder::update_reminder(db.pool(), "missing", &complete, at(1, 1, 8)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_fields_checks_expected_status() {
        let db = test_db().await;
        let mut created = reminder::insert_reminder(db.pool(), draft("Call", at(1, 15, 9), None))
            .await
            .unwrap();

        created.status = ReminderStatus::Completed;
        let written = reminder::update_fields(db.pool(), &created, ReminderStatus::Snoozed)
            .await
            .unwrap();
        assert!(!written);

        let written = reminder::update_fields(db.pool(), &created, ReminderStatus::Pending)
            .await
            .unwrap();
        assert!(written);
    }

    #[tokio::test]
    async fn test_list_sorting_and_limits() {
        let db = test_db().await;
        for (title, remind_at, created_at) in [
            ("first", at(3, 1, 9), at(1, 1, 8)),
            ("second", at(1, 1, 9), at(1, 2, 8)),
            ("third", at(2, 1, 9), at(1, 3, 8)),
        ] {
            let mut d = draft(title, remind_at, None);
            d.created_at = created_at;
            reminder::insert_reminder(db.pool(), d).await.unwrap();
        }
        let mut other = draft("not mine", at(5, 1, 9), None);
        other.user_id = "user-2".to_string();
        reminder::insert_reminder(db.pool(), other).await.unwrap();

        let recent = reminder::list_reminders(db.pool(), "user-1", ReminderSort::CreatedAt, Some(2))
            .await
            .unwrap();
        let titles: Vec<_> = recent.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["third", "second"]);

        let history = reminder::list_reminders(db.pool(), "user-1", ReminderSort::RemindAt, None)
            .await
            .unwrap();
        let titles: Vec<_> = history.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "third", "second"]);
    }
}
