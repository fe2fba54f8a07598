//! Ordered validation rules for task payloads.
//!
//! The rules live in a single table evaluated top to bottom; the first rule
//! whose condition holds decides the error, later rules are never consulted.
//! Each rule names the form [`Field`] that should receive focus.
//!
//! The client runs the whole table before submitting an edit. The server
//! runs the same table restricted to the fields a request actually touched
//! (see [`validate_fields`]).
//!
//! Lengths are counted in UTF-16 code units, the way a browser counts a
//! form value, so a character outside the Basic Multilingual Plane (most
//! emoji) counts as two.

use std::collections::HashSet;

use crate::dates;
use crate::task::{Priority, TaskPayload, TaskStatus};

/// Minimum title length in UTF-16 code units.
pub const MIN_TITLE_LENGTH: usize = 3;
/// Maximum title length in UTF-16 code units.
pub const MAX_TITLE_LENGTH: usize = 100;
/// Maximum description length in UTF-16 code units.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
/// Maximum number of tags on one task.
pub const MAX_TAGS: usize = 10;
/// Minimum tag length in UTF-16 code units.
pub const MIN_TAG_LENGTH: usize = 2;
/// Maximum tag length in UTF-16 code units.
pub const MAX_TAG_LENGTH: usize = 20;

/// An edit-form field, used as the focus target of a failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The title input.
    Title,
    /// The description textarea.
    Description,
    /// The priority select.
    Priority,
    /// The status select.
    Status,
    /// The due-date input.
    DueDate,
    /// The tag input of the tag widget.
    Tags,
}

/// A violated validation rule. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// Title is empty.
    #[error("Title is required")]
    TitleRequired,
    /// Title is shorter than [`MIN_TITLE_LENGTH`].
    #[error("Title must be at least 3 characters")]
    TitleTooShort,
    /// Title is longer than [`MAX_TITLE_LENGTH`].
    #[error("Title must not exceed 100 characters")]
    TitleTooLong,
    /// Description is longer than [`MAX_DESCRIPTION_LENGTH`].
    #[error("Description must not exceed 500 characters")]
    DescriptionTooLong,
    /// Priority is not one of the known values.
    #[error("Select a valid priority")]
    InvalidPriority,
    /// Status is not one of the known values.
    #[error("Select a valid status")]
    InvalidStatus,
    /// Due date is empty.
    #[error("Due date is required")]
    DueDateRequired,
    /// Due date does not parse to a calendar date.
    #[error("Due date is invalid")]
    DueDateInvalid,
    /// No tags at all.
    #[error("Please add at least one tag")]
    TagsRequired,
    /// More than [`MAX_TAGS`] tags.
    #[error("Maximum 10 tags allowed")]
    TooManyTags,
    /// A tag is outside the allowed length range.
    #[error("Tags must be 2-20 characters")]
    TagLength,
    /// The same tag appears twice.
    #[error("Tags must be unique")]
    DuplicateTag,
}

impl ValidationError {
    /// The field that should receive focus for this error.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::TitleRequired | Self::TitleTooShort | Self::TitleTooLong => Field::Title,
            Self::DescriptionTooLong => Field::Description,
            Self::InvalidPriority => Field::Priority,
            Self::InvalidStatus => Field::Status,
            Self::DueDateRequired | Self::DueDateInvalid => Field::DueDate,
            Self::TagsRequired | Self::TooManyTags | Self::TagLength | Self::DuplicateTag => {
                Field::Tags
            }
        }
    }
}

/// One row of the rule table.
struct Rule {
    violated: fn(&TaskPayload) -> bool,
    error: ValidationError,
}

/// The rule table, in evaluation order.
const RULES: [Rule; 12] = [
    Rule {
        violated: |p| p.title.is_empty(),
        error: ValidationError::TitleRequired,
    },
    Rule {
        violated: |p| !p.title.is_empty() && utf16_len(&p.title) < MIN_TITLE_LENGTH,
        error: ValidationError::TitleTooShort,
    },
    Rule {
        violated: |p| utf16_len(&p.title) > MAX_TITLE_LENGTH,
        error: ValidationError::TitleTooLong,
    },
    Rule {
        violated: |p| utf16_len(&p.description) > MAX_DESCRIPTION_LENGTH,
        error: ValidationError::DescriptionTooLong,
    },
    Rule {
        violated: |p| !Priority::ALL.iter().any(|v| v.as_str() == p.priority),
        error: ValidationError::InvalidPriority,
    },
    Rule {
        violated: |p| !TaskStatus::ALL.iter().any(|v| v.as_str() == p.status),
        error: ValidationError::InvalidStatus,
    },
    Rule {
        violated: |p| p.due_date.is_empty(),
        error: ValidationError::DueDateRequired,
    },
    Rule {
        violated: |p| dates::parse_due_date(&p.due_date).is_none(),
        error: ValidationError::DueDateInvalid,
    },
    Rule {
        violated: |p| p.tags.is_empty(),
        error: ValidationError::TagsRequired,
    },
    Rule {
        violated: |p| p.tags.len() > MAX_TAGS,
        error: ValidationError::TooManyTags,
    },
    Rule {
        violated: |p| {
            p.tags
                .iter()
                .any(|t| !(MIN_TAG_LENGTH..=MAX_TAG_LENGTH).contains(&utf16_len(t)))
        },
        error: ValidationError::TagLength,
    },
    Rule {
        violated: |p| has_duplicates(&p.tags),
        error: ValidationError::DuplicateTag,
    },
];

/// Runs every rule in order and returns the first violation.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first rule the payload violates.
pub fn validate_payload(payload: &TaskPayload) -> Result<(), ValidationError> {
    first_violation(payload, |_| true)
}

/// Runs only the rules belonging to `fields`, in table order.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first applicable rule the payload
/// violates.
pub fn validate_fields(payload: &TaskPayload, fields: &[Field]) -> Result<(), ValidationError> {
    first_violation(payload, |field| fields.contains(&field))
}

fn first_violation(
    payload: &TaskPayload,
    applies: impl Fn(Field) -> bool,
) -> Result<(), ValidationError> {
    RULES
        .iter()
        .filter(|rule| applies(rule.error.field()))
        .find(|rule| (rule.violated)(payload))
        .map_or(Ok(()), |rule| Err(rule.error))
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn has_duplicates(tags: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(tags.len());
    !tags.iter().all(|t| seen.insert(t.as_str()))
}
