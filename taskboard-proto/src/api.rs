//! HTTP wire types for the task endpoints.
//!
//! Every non-list response body is a JSON object carrying a `message`;
//! a successful update also carries the merged `task`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::task::{Task, TaskRecord};

/// Message returned with a successful update.
pub const UPDATE_SUCCESS_MESSAGE: &str = "Task updated successfully!";
/// Message returned when no task matches the requested id.
pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found.";
/// Message returned when the backing store does not exist.
pub const NO_TASKS_MESSAGE: &str = "No tasks found to edit.";

/// Body of a successful `PUT /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The merged record exactly as persisted.
    pub task: TaskRecord,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable error.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A response body as the client sees it, read leniently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    /// The `message` member, when present as a non-empty string.
    pub message: Option<String>,
    /// The `task` member, when present and well-formed.
    pub task: Option<Task>,
}

/// Parses a response body without ever failing.
///
/// An empty body, a body that is not JSON, or a JSON value that is not an
/// object all read as an empty [`Reply`], so the status alone decides
/// whether a request succeeded.
#[must_use]
pub fn parse_reply(body: &str) -> Reply {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return Reply::default();
    };
    let message = map
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let task = map
        .get("task")
        .and_then(|t| serde_json::from_value(t.clone()).ok());
    Reply { message, task }
}
