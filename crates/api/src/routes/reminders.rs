//! Reminder routes.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::{Local, NaiveDateTime};
use reminder_core::{timestamp, Reminder, ReminderUpdate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::service::CreateRequest;
use crate::state::AppState;

/// A reminder as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub extra_info: Option<String>,
    pub remind_at: String,
    pub recurring_rule: Option<String>,
    pub recurrence_queue: Vec<String>,
    pub status: String,
    pub creation_mode: String,
    pub created_at: String,
}

impl From<&Reminder> for ReminderResponse {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            title: reminder.title.clone(),
            extra_info: reminder.extra_info.clone(),
            remind_at: timestamp::format(&reminder.remind_at),
            recurring_rule: reminder.rule_name().map(str::to_string),
            recurrence_queue: reminder
                .recurrence_queue()
                .iter()
                .map(timestamp::format)
                .collect(),
            status: reminder.status.to_string(),
            creation_mode: reminder.creation_mode.to_string(),
            created_at: timestamp::format(&reminder.created_at),
        }
    }
}

/// Result of an update.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub status: &'static str,
    pub updated_id: String,
    /// The follow-up reminder created by completing a recurring one.
    pub successor_id: Option<String>,
}

/// Result of a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub deleted_id: String,
}

/// Create a reminder from a multipart form.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReminderResponse>> {
    let request = read_create_form(multipart).await?;
    let reminder = state.reminders.create(request, now()).await?;
    Ok(Json(ReminderResponse::from(&reminder)))
}

/// Most recently created reminders.
pub async fn home_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ReminderResponse>>> {
    let reminders = state.reminders.list_recent(&user_id).await?;
    Ok(Json(reminders.iter().map(ReminderResponse::from).collect()))
}

/// Full history, latest scheduled first.
pub async fn history_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ReminderResponse>>> {
    let reminders = state.reminders.list_history(&user_id).await?;
    Ok(Json(reminders.iter().map(ReminderResponse::from).collect()))
}

/// Edit, snooze or complete a reminder.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ReminderUpdate>,
) -> Result<Json<UpdateResponse>> {
    let outcome = state.reminders.update(&id, &update, now()).await?;
    Ok(Json(UpdateResponse {
        status: "success",
        updated_id: outcome.reminder.id,
        successor_id: outcome.successor.map(|successor| successor.id),
    }))
}

/// Delete one reminder.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.reminders.delete(&id).await?;
    Ok(Json(DeleteResponse {
        status: "deleted",
        deleted_id: id,
    }))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

async fn read_create_form(mut multipart: Multipart) -> Result<CreateRequest> {
    let mut request = CreateRequest::default();
    let mut has_user_id = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let mime_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            // Browsers send an empty part when no file was chosen.
            if !data.is_empty() {
                request.audio = Some((data.to_vec(), mime_type));
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "user_id" => {
                has_user_id = true;
                request.user_id = value;
            }
            "mode" => request.mode = Some(value),
            "text" => request.text = Some(value),
            "title" => request.title = Some(value),
            "remind_at" => request.remind_at = Some(value),
            "recurring_rule" => request.recurring_rule = Some(value),
            "recurrence_queue" => request.recurrence_queue = parse_queue_field(&value),
            "extra_info" => request.extra_info = Some(value),
            "local_time" => request.local_time = Some(value),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    if !has_user_id {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }

    Ok(request)
}

/// The queue arrives as a JSON array of timestamp strings.
fn parse_queue_field(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(value).unwrap_or_else(|err| {
        warn!(error = %err, "Ignoring malformed recurrence_queue field");
        Vec::new()
    })
}
