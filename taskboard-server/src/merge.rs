//! Overwrite-if-truthy merge of a request body onto a stored record.
//!
//! A body field replaces the stored value only when it is truthy: `null`,
//! `""`, `0` and `false` are treated as "not supplied" and leave the stored
//! value alone, so a client can never blank a field by sending an empty
//! form value. `id` and `createdAt` are immutable and ignored.
//!
//! Fields that do get replaced are validated with the shared rule table,
//! restricted to the touched fields. Only touched keys are written into the
//! record; every other key keeps its stored value and form, valid or not.

use serde::Deserialize;
use serde_json::{Map, Value};
use taskboard_proto::task::{TaskPayload, TaskRecord};
use taskboard_proto::validate::{self, Field, ValidationError};

/// Body keys that can never be changed by an update.
const IMMUTABLE_FIELDS: [&str; 2] = ["id", "createdAt"];

/// Errors that reject an update body.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// The body is not an object, or a known field has the wrong JSON type.
    #[error("{0}")]
    Malformed(String),

    /// A touched field violates a validation rule.
    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// The truthy subset of an update body, typed.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority, any case.
    pub priority: Option<String>,
    /// New status, any case.
    pub status: Option<String>,
    /// New due date.
    pub due_date: Option<String>,
    /// New tag list, replacing the old one wholesale.
    pub tags: Option<Vec<String>>,
    /// Fields outside the task model, merged into the record verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskPatch {
    /// Builds a patch from a raw request body, dropping falsy and immutable
    /// members.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Malformed`] if the body is not a JSON object or
    /// a remaining member has the wrong type (e.g. a numeric title).
    pub fn from_body(body: Value) -> Result<Self, MergeError> {
        let Value::Object(members) = body else {
            return Err(MergeError::Malformed(
                "request body must be a JSON object".to_string(),
            ));
        };
        let truthy: Map<String, Value> = members
            .into_iter()
            .filter(|(key, value)| !IMMUTABLE_FIELDS.contains(&key.as_str()) && is_truthy(value))
            .collect();
        serde_json::from_value(Value::Object(truthy)).map_err(|e| MergeError::Malformed(e.to_string()))
    }

    /// Returns the model fields this patch replaces, in form order.
    #[must_use]
    pub fn touched_fields(&self) -> Vec<Field> {
        [
            (self.title.is_some(), Field::Title),
            (self.description.is_some(), Field::Description),
            (self.priority.is_some(), Field::Priority),
            (self.status.is_some(), Field::Status),
            (self.due_date.is_some(), Field::DueDate),
            (self.tags.is_some(), Field::Tags),
        ]
        .into_iter()
        .filter_map(|(touched, field)| touched.then_some(field))
        .collect()
    }

    /// Returns `true` if applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty() && self.extra.is_empty()
    }

    /// The patch as a form payload, for checking the touched fields.
    /// Priority and status are lower-cased; untouched fields are left empty.
    fn as_payload(&self) -> TaskPayload {
        TaskPayload {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            priority: self.priority.as_deref().map(str::to_lowercase).unwrap_or_default(),
            status: self.status.as_deref().map(str::to_lowercase).unwrap_or_default(),
            due_date: self.due_date.clone().unwrap_or_default(),
            tags: self.tags.clone().unwrap_or_default(),
        }
    }
}

/// JavaScript truthiness of a JSON value.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_normal() || f.is_subnormal()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Applies `patch` to `stored`, returning the merged record.
///
/// Priority and status are matched case-insensitively and written
/// lower-case. Keys already in the record keep their position.
///
/// # Errors
///
/// Returns [`MergeError::Invalid`] with the first violated rule among the
/// touched fields; `stored` is never modified.
pub fn merge_task(stored: &TaskRecord, patch: TaskPatch) -> Result<TaskRecord, MergeError> {
    let view = patch.as_payload();
    validate::validate_fields(&view, &patch.touched_fields())?;

    let TaskPatch {
        title,
        description,
        priority,
        status,
        due_date,
        tags,
        extra,
    } = patch;
    let updates = [
        ("title", title.map(Value::String)),
        ("description", description.map(Value::String)),
        ("priority", priority.map(|_| Value::String(view.priority))),
        ("status", status.map(|_| Value::String(view.status))),
        ("dueDate", due_date.map(Value::String)),
        ("tags", tags.map(Value::from)),
    ];

    let mut merged = stored.clone();
    for (key, value) in updates {
        if let Some(value) = value {
            merged.insert(key.to_string(), value);
        }
    }
    merged.extend(extra);
    Ok(merged)
}
