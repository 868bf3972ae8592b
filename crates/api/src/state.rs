//! Application state shared across handlers.

use crate::service::ReminderService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Reminder operations.
    pub reminders: ReminderService,
}

impl AppState {
    /// Create new application state.
    pub fn new(reminders: ReminderService) -> Self {
        Self { reminders }
    }
}
