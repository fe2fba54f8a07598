//! Task model shared by the server and the client.
//!
//! The store keeps each task as a [`TaskRecord`], the JSON object exactly as
//! it was read, so fields an update does not touch are written back the way
//! they were found. [`TaskBoard`] is the whole stored document.
//!
//! [`Task`] is the client's typed view of a record and [`TaskPayload`] the raw
//! edit-form payload it submits. Reading a [`Task`] is tolerant: missing or
//! oddly typed fields take defaults, and values outside the known priority
//! and status sets are kept as text.

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::validate::ValidationError;

/// A stored task, as the JSON object found in the document.
pub type TaskRecord = Map<String, Value>;

/// Identifier of a task.
///
/// Stored documents contain both numeric and string ids, so the stored
/// JSON representation is kept and comparison against a path segment is
/// loose (see [`TaskId::matches`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// A numeric id, e.g. `1`.
    Number(i64),
    /// A string id, e.g. `"task-1700000000000"`.
    Text(String),
}

impl TaskId {
    /// Returns `true` if this id refers to the same task as `raw`.
    ///
    /// A numeric id matches any string that parses to the same integer, so
    /// `1` and `"1"` are the same task. String ids compare exactly.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Number(n) => raw.trim().parse::<i64>().is_ok_and(|parsed| parsed == *n),
            Self::Text(s) => s == raw,
        }
    }

    /// Reads the `id` member of a stored record.
    ///
    /// Returns `None` when the record has no id, or one that is neither an
    /// integer nor a string.
    #[must_use]
    pub fn of_record(record: &TaskRecord) -> Option<Self> {
        match record.get("id")? {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Priority of a task. Case-insensitive on input, lower-case when stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default priority for new and edited tasks.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Every priority, in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the stored (lower-case) form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::InvalidPriority)
    }
}

/// Workflow status of a task. Case-insensitive on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the stored (lower-case) form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::InvalidStatus)
    }
}

/// Typed view of a stored task, as the client reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier, never mutated after creation.
    pub id: TaskId,
    /// Task title.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    /// Free-form description; absent is the empty string.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    /// Priority exactly as stored, which may be any case or an unknown value.
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Status exactly as stored.
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Due date as entered (usually `YYYY-MM-DD`).
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Ordered tag list. Members that are not strings are skipped.
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    /// Creation time as stored: an ISO string, or milliseconds in older data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    /// Fields this model does not know about, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task with the given id and title, default priority and
    /// status, and `created_at` set to now.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Some(Priority::default().to_string()),
            status: Some(TaskStatus::default().to_string()),
            due_date: None,
            tags: Vec::new(),
            created_at: Some(Value::String(
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            extra: Map::new(),
        }
    }

    /// Returns the priority if the stored value is a known one.
    #[must_use]
    pub fn parsed_priority(&self) -> Option<Priority> {
        self.priority.as_deref()?.parse().ok()
    }

    /// Returns the status if the stored value is a known one.
    #[must_use]
    pub fn parsed_status(&self) -> Option<TaskStatus> {
        self.status.as_deref()?.parse().ok()
    }
}

/// The whole stored document: `{"tasks": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBoard {
    /// All tasks, in display order.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    /// Other top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskBoard {
    /// Creates a board holding the given records.
    #[must_use]
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks,
            extra: Map::new(),
        }
    }

    /// Returns the index of the record whose id loosely matches `raw_id`.
    #[must_use]
    pub fn position(&self, raw_id: &str) -> Option<usize> {
        self.tasks.iter().position(|r| id_matches(r, raw_id))
    }

    /// Returns the record whose id loosely matches `raw_id`.
    #[must_use]
    pub fn find(&self, raw_id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|r| id_matches(r, raw_id))
    }
}

fn id_matches(record: &TaskRecord, raw_id: &str) -> bool {
    TaskId::of_record(record).is_some_and(|id| id.matches(raw_id))
}

/// The edit-form payload submitted by the client.
///
/// Every field is the raw form value so that validation sees exactly what
/// the user entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Lower-cased priority.
    pub priority: String,
    /// Lower-cased status.
    pub status: String,
    /// Due date as entered.
    pub due_date: String,
    /// Current tag list.
    pub tags: Vec<String>,
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
