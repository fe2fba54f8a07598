//! Integration tests for editing a task over HTTP.
//!
//! Runs the server in-process against a JSON file in a temp directory and
//! checks both the HTTP replies and what ends up on disk:
//! - Partial updates merge onto the stored record and rewrite it in place
//! - Falsy values never blank a stored field
//! - Missing store, unknown id, invalid fields and unreadable files

use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};
use taskboard_server::server::{AppState, start_server};
use taskboard_server::store::JsonFileStore;

// =============================================================================
// Test helpers
// =============================================================================

/// Start the server in-process on a random port, backed by `data_file`.
async fn start(data_file: &Path) -> (String, tokio::task::JoinHandle<()>) {
    let state = Arc::new(AppState::new(JsonFileStore::new(data_file)));
    let (addr, handle) = start_server("127.0.0.1:0", state)
        .await
        .expect("failed to start task server");
    (format!("http://{addr}"), handle)
}

fn seed(path: &Path) {
    let doc = json!({
        "tasks": [
            {
                "id": 1,
                "title": "Test Task",
                "description": "Projector and screen",
                "priority": "medium",
                "dueDate": "2026-01-15",
                "tags": ["office", "setup"],
                "status": "pending",
                "createdAt": "2026-01-01T09:00:00Z"
            },
            {
                "id": "task-2",
                "title": "Another Task",
                "description": "",
                "priority": "low",
                "tags": ["home"],
                "status": "completed"
            }
        ]
    });
    std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
}

fn read_doc(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

async fn put(base: &str, id: &str, body: &Value) -> (u16, Value) {
    let res = reqwest::Client::new()
        .put(format!("{base}/tasks/{id}"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

// =============================================================================
// Successful updates
// =============================================================================

#[tokio::test]
async fn title_update_rewrites_record_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"title": "Edited Task Title"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Task updated successfully!");
    assert_eq!(body["task"]["title"], "Edited Task Title");
    assert_eq!(body["task"]["description"], "Projector and screen");

    let doc = read_doc(&path);
    let tasks = doc["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[0]["title"], "Edited Task Title");
    assert_eq!(tasks[0]["createdAt"], "2026-01-01T09:00:00Z");
    assert_eq!(tasks[1]["title"], "Another Task");
}

#[tokio::test]
async fn full_update_replaces_every_supplied_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let (base, _handle) = start(&path).await;

    let (status, body) = put(
        &base,
        "1",
        &json!({
            "title": "API Updated",
            "description": "Desc",
            "priority": "high",
            "dueDate": "2026-02-01",
            "tags": ["api", "updated"],
            "status": "in-progress"
        }),
    )
    .await;

    assert_eq!(status, 200);
    let task = &body["task"];
    assert_eq!(task["title"], "API Updated");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["dueDate"], "2026-02-01");
    assert_eq!(task["tags"], json!(["api", "updated"]));
    assert_eq!(task["status"], "in-progress");
    assert_eq!(read_doc(&path)["tasks"][0], *task);
}

#[tokio::test]
async fn falsy_values_leave_the_record_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let before = read_doc(&path)["tasks"][0].clone();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(
        &base,
        "1",
        &json!({"title": "", "description": null, "dueDate": "", "status": ""}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], before);
    assert_eq!(read_doc(&path)["tasks"][0], before);
}

#[tokio::test]
async fn numeric_id_matches_string_path_segment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"status": "completed"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["task"]["id"], 1);

    let (status, body) = put(&base, "task-2", &json!({"priority": "HIGH"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["task"]["priority"], "high");
}

#[tokio::test]
async fn id_and_created_at_cannot_be_changed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let (base, _handle) = start(&path).await;

    let (status, body) = put(
        &base,
        "1",
        &json!({"id": 42, "createdAt": "1999-01-01T00:00:00Z", "title": "Renamed"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["task"]["id"], 1);
    assert_eq!(body["task"]["createdAt"], "2026-01-01T09:00:00Z");
}

#[tokio::test]
async fn falsy_update_leaves_the_file_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    let doc = json!({
        "tasks": [{
            "id": 1,
            "title": "Book venue",
            "description": "Conference room",
            "priority": "High",
            "dueDate": "2026-02-01",
            "tags": ["venue"],
            "status": "Pending",
            "createdAt": "2026-01-15T10:00:00.000Z"
        }]
    });
    let before = serde_json::to_string_pretty(&doc).unwrap();
    std::fs::write(&path, &before).unwrap();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(
        &base,
        "1",
        &json!({"title": "", "description": null, "dueDate": "", "status": ""}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], doc["tasks"][0]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn legacy_neighbour_record_does_not_block_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    let legacy = json!({
        "id": 2,
        "title": "Imported",
        "priority": "urgent",
        "status": "done",
        "createdAt": 1_700_000_000_000_i64
    });
    let doc = json!({
        "tasks": [
            {"id": 1, "title": "Test Task", "status": "pending", "createdAt": 1_700_000_000_000_i64},
            legacy.clone()
        ]
    });
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"status": "completed"})).await;

    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["task"]["status"], "completed");
    assert_eq!(body["task"]["createdAt"], 1_700_000_000_000_i64);
    let saved = read_doc(&path);
    assert_eq!(saved["tasks"][0]["status"], "completed");
    assert_eq!(saved["tasks"][1], legacy);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn unknown_id_is_not_found_and_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let before = std::fs::read_to_string(&path).unwrap();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "non-existent-id-99999", &json!({"title": "Ghost Task"})).await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "Task not found."}));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn missing_file_reports_no_tasks_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"title": "Anything"})).await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "No tasks found to edit."}));
    assert!(!path.exists());
}

#[tokio::test]
async fn corrupt_file_is_a_server_error_with_parser_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    std::fs::write(&path, "{\"tasks\": [").unwrap();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"title": "Anything"})).await;

    assert_eq!(status, 500);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("EOF"), "got: {message}");
}

#[tokio::test]
async fn invalid_field_is_rejected_and_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let before = std::fs::read_to_string(&path).unwrap();
    let (base, _handle) = start(&path).await;

    let (status, body) = put(&base, "1", &json!({"tags": ["x"]})).await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Tags must be 2-20 characters");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

// =============================================================================
// Read endpoints
// =============================================================================

#[tokio::test]
async fn list_and_get_serve_stored_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    seed(&path);
    let (base, _handle) = start(&path).await;

    let tasks: Vec<Value> = reqwest::get(format!("{base}/tasks"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);

    let res = reqwest::get(format!("{base}/tasks/task-2")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let task: Value = res.json().await.unwrap();
    assert_eq!(task["title"], "Another Task");

    let res = reqwest::get(format!("{base}/tasks/99")).await.unwrap();
    assert_eq!(res.status().as_u16(), 404);
}
