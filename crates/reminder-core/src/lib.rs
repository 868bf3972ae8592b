//! Recurrence and lifecycle engine for personal reminders.
//!
//! This crate holds everything about a reminder that does not touch storage,
//! HTTP, or a language model directly:
//!
//! - [`Reminder`] / [`ReminderDraft`] - The stored record and the shape used to create one
//! - [`RecurrenceRule`] - A fixed cadence or a queue of custom dates
//! - [`next_occurrence`] / [`advance`] - Pure next-date calculation
//! - [`lifecycle`] - Status transitions and successor generation
//! - [`extraction`] - Validation of language-model payloads
//! - [`Extractor`] - The trait a language-model backend implements
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use reminder_core::{next_occurrence, Frequency};
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 1, 31)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let next = next_occurrence(anchor, Frequency::Monthly);
//! assert_eq!(next.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
//! ```

mod error;
mod extractor;
mod models;
mod queue;
mod recurrence;
mod rule;

pub mod extraction;
pub mod lifecycle;
pub mod manual;
pub mod prompt;
pub mod timestamp;

pub use error::{ExtractionError, ExtractorError, RuleError, ValidationError};
pub use extractor::{ExtractionInput, Extractor, InputModality};
pub use lifecycle::{ReminderUpdate, Transition};
pub use models::{CreationMode, Reminder, ReminderDraft, ReminderStatus};
pub use queue::advance;
pub use recurrence::{next_for_rule, next_occurrence};
pub use rule::{Frequency, RecurrenceRule};

// Re-export async_trait for extractor implementations
pub use async_trait::async_trait;
