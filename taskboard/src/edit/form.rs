//! Edit form field values.

use taskboard_proto::dates;
use taskboard_proto::task::{Priority, Task, TaskPayload, TaskStatus};

/// Text values of the edit form, as the user sees and types them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    /// Title input.
    pub title: String,
    /// Description text area.
    pub description: String,
    /// Priority selector value.
    pub priority: String,
    /// Status selector value.
    pub status: String,
    /// Due date input, `YYYY-MM-DD` or empty.
    pub due_date: String,
}

impl EditForm {
    /// Fills the form from a stored task.
    ///
    /// Priority and status show lower-cased, with missing values as `medium`
    /// and `pending`. An unknown stored value is shown as it is and fails
    /// validation on submit. The due date is shown in input format, or blank
    /// when it does not parse.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: lower_or(
                task.priority.as_deref().unwrap_or_default(),
                Priority::default().as_str(),
            ),
            status: lower_or(
                task.status.as_deref().unwrap_or_default(),
                TaskStatus::default().as_str(),
            ),
            due_date: dates::format_for_input(task.due_date.as_deref()),
        }
    }

    /// Assembles the payload sent on submit.
    ///
    /// Title and description are trimmed; priority and status are
    /// lower-cased, with blank values falling back to the defaults.
    #[must_use]
    pub fn to_payload(&self, tags: &[String]) -> TaskPayload {
        TaskPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            priority: lower_or(&self.priority, Priority::default().as_str()),
            status: lower_or(&self.status, TaskStatus::default().as_str()),
            due_date: self.due_date.clone(),
            tags: tags.to_vec(),
        }
    }
}

fn lower_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_lowercase()
    }
}
