use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use database::Database;
use mock_extractor::{ExtractionInput, FailingExtractor, ScriptedExtractor};
use reminder_core::Extractor;
use reminders_api::{app, AppState, ReminderService};
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "reminders-form-boundary";

async fn router_with(extractor: Arc<dyn Extractor>) -> Router {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    app(AppState::new(ReminderService::new(db, extractor, 2)), 1024 * 1024)
}

async fn manual_router() -> Router {
    router_with(Arc::new(FailingExtractor::new())).await
}

/// Multipart body with text fields and an optional `file` part.
fn form(fields: &[(&str, &str)], file: Option<&[u8]>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(data) = file {
        let filename = if data.is_empty() { "" } else { "note.webm" };
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: audio/webm\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/reminders/create")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let router = manual_router().await;
    let (status, body) = send(&router, empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn create_without_user_id_is_bad_request() {
    let router = manual_router().await;
    let request = form(
        &[("title", "Dentist"), ("remind_at", "2024-01-15T09:00:00")],
        None,
    );

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("user_id"));
}

#[tokio::test]
async fn manual_create_reads_queue_as_json_array() {
    let router = manual_router().await;
    let request = form(
        &[
            ("user_id", "user-1"),
            ("mode", "manual"),
            ("title", "Stretch"),
            ("remind_at", "2024-01-15T07:00:00"),
            ("recurring_rule", "custom"),
            (
                "recurrence_queue",
                r#"["2024-01-18T07:00:00", "2024-01-21T07:00:00"]"#,
            ),
        ],
        None,
    );

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Stretch");
    assert_eq!(body["remind_at"], "2024-01-15T07:00:00");
    assert_eq!(body["recurring_rule"], "custom");
    assert_eq!(
        body["recurrence_queue"],
        json!(["2024-01-18T07:00:00", "2024-01-21T07:00:00"])
    );
    assert_eq!(body["status"], "pending");
    assert_eq!(body["creation_mode"], "manual");
}

#[tokio::test]
async fn empty_file_part_is_ignored() {
    let extractor = Arc::new(ScriptedExtractor::new(
        r#"{"title": "Buy milk", "remind_at": "2024-01-15T18:00:00"}"#,
    ));
    let router = router_with(extractor.clone()).await;
    let request = form(
        &[("user_id", "user-1"), ("text", "buy milk tonight")],
        Some(b""),
    );

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["creation_mode"], "ai_text");

    let calls = extractor.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].input,
        ExtractionInput::Text("buy milk tonight".to_string())
    );
}

#[tokio::test]
async fn audio_file_part_is_sent_to_extractor() {
    let extractor = Arc::new(ScriptedExtractor::new(
        r#"{"title": "Gym", "remind_at": "2024-01-15T07:00:00", "recurring_rule": "weekdays"}"#,
    ));
    let router = router_with(extractor.clone()).await;
    let request = form(&[("user_id", "user-1")], Some(&[1, 2, 3]));

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["creation_mode"], "voice");
    assert_eq!(body["recurring_rule"], "weekdays");

    let calls = extractor.calls().await;
    assert_eq!(
        calls[0].input,
        ExtractionInput::Audio {
            data: vec![1, 2, 3],
            mime_type: Some("audio/webm".to_string()),
        }
    );
}

#[tokio::test]
async fn failed_extraction_returns_bad_gateway() {
    let router = manual_router().await;
    let request = form(&[("user_id", "user-1"), ("text", "buy milk")], None);

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());

    let (_, history) = send(
        &router,
        empty_request(Method::GET, "/reminders/history/user-1"),
    )
    .await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn complete_update_and_delete_round() {
    let router = manual_router().await;
    let (_, created) = send(
        &router,
        form(
            &[
                ("user_id", "user-1"),
                ("title", "Recycling"),
                ("remind_at", "2024-01-15T09:00:00"),
                ("recurring_rule", "weekly"),
            ],
            None,
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/reminders/{id}"),
            json!({ "status": "completed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["updated_id"], id.as_str());
    let successor_id = body["successor_id"].as_str().unwrap().to_string();

    let (_, history) = send(
        &router,
        empty_request(Method::GET, "/reminders/history/user-1"),
    )
    .await;
    assert_eq!(history[0]["id"], successor_id.as_str());
    assert_eq!(history[0]["remind_at"], "2024-01-22T09:00:00");
    assert_eq!(history[1]["status"], "completed");

    // Completing again reports no successor.
    let (status, body) = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/reminders/{id}"),
            json!({ "status": "completed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successor_id"], Value::Null);

    let (status, body) = send(
        &router,
        empty_request(Method::DELETE, &format!("/reminders/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "deleted", "deleted_id": id }));

    let (_, home) = send(&router, empty_request(Method::GET, "/reminders/home/user-1")).await;
    assert_eq!(home.as_array().unwrap().len(), 1);
    assert_eq!(home[0]["id"], successor_id.as_str());
}

#[tokio::test]
async fn unknown_id_returns_not_found_json() {
    let router = manual_router().await;

    let (status, body) = send(
        &router,
        json_request(
            Method::PUT,
            "/reminders/missing",
            json!({ "title": "Renamed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let (status, body) = send(
        &router,
        empty_request(Method::DELETE, "/reminders/missing"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn explicit_null_clears_extra_info() {
    let router = manual_router().await;
    let (_, created) = send(
        &router,
        form(
            &[
                ("user_id", "user-1"),
                ("title", "Dentist"),
                ("remind_at", "2024-01-15T09:00:00"),
                ("extra_info", "Bring insurance card"),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(created["extra_info"], "Bring insurance card");
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/reminders/{id}"),
            json!({ "extra_info": null }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(
        &router,
        empty_request(Method::GET, "/reminders/history/user-1"),
    )
    .await;
    assert_eq!(history[0]["extra_info"], Value::Null);
    assert_eq!(history[0]["title"], "Dentist");
}
