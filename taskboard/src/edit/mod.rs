//! Edit session for a single task.
//!
//! An [`EditSession`] holds everything the detail view needs while a task is
//! open: the selected task, the form values, the tag widget, whether edit
//! mode is on and which field has focus. Submitting validates the form
//! locally and only then sends the update through the [`TaskApi`].
//!
//! ```text
//!  open(task) ──► viewing ──click_edit──► editing ──click_edit──► submit
//!                    ▲                                              │
//!                    └──────────── 200: re-fetch, exit ◄────────────┤
//!                                  otherwise: stay in editing ◄─────┘
//! ```

pub mod form;
pub mod tags;

use taskboard_proto::task::{Task, TaskId, TaskPayload};
use taskboard_proto::validate::{self, Field, ValidationError};

use crate::api::{ClientError, TaskApi};
use form::EditForm;
use tags::{TagInput, TagKey};

/// Edit button label outside edit mode.
pub const EDIT_LABEL: &str = "Edit Task";
/// Edit button label in edit mode.
pub const SAVE_LABEL: &str = "Save Changes";
/// Shown after a save when the server sent no message.
pub const SAVED_MESSAGE: &str = "Task updated!";
/// Shown when a save fails without a server message.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to update task.";

/// Where a click inside the tag area landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The container background, outside any pill.
    Container,
    /// The body of the pill at this index.
    Pill(usize),
    /// The remove control of the pill at this index.
    RemovePill(usize),
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No task is open; nothing happened.
    NoSelection,
    /// A field failed validation. Focus has moved to it and nothing was sent.
    Invalid(ValidationError),
    /// The server accepted the update. Edit mode is off.
    Saved {
        /// Message to show the user.
        message: String,
    },
    /// The update was not applied. Edit mode is still on.
    Failed {
        /// Message to show the user.
        message: String,
    },
}

impl SubmitOutcome {
    /// Returns the message to show the user, if there is one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoSelection => None,
            Self::Invalid(e) => Some(e.to_string()),
            Self::Saved { message } | Self::Failed { message } => Some(message.clone()),
        }
    }
}

/// State of the detail view for one open task.
pub struct EditSession<A> {
    api: A,
    task: Option<Task>,
    form: EditForm,
    tags: TagInput,
    editing: bool,
    focus: Option<Field>,
}

impl<A: TaskApi> EditSession<A> {
    /// Creates a session with no task open.
    pub fn new(api: A) -> Self {
        Self {
            api,
            task: None,
            form: EditForm::default(),
            tags: TagInput::new(),
            editing: false,
            focus: None,
        }
    }

    /// Returns the API this session talks through.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Opens `task`: fills the form and tags from it and leaves edit mode.
    pub fn open(&mut self, task: Task) {
        self.form = EditForm::from_task(&task);
        self.tags.replace(task.tags.iter().cloned());
        self.task = Some(task);
        self.focus = None;
        self.set_edit_mode(false);
    }

    /// Fetches the task with `id` and opens it.
    ///
    /// # Errors
    ///
    /// Returns the API error if the task cannot be fetched; the session is
    /// left unchanged.
    pub async fn open_by_id(&mut self, id: &TaskId) -> Result<(), ClientError> {
        let task = self.api.fetch_task(id).await?;
        self.open(task);
        Ok(())
    }

    /// The open task, as last loaded.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Whether the form is shown instead of the read-only detail.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Label of the edit button in the current mode.
    #[must_use]
    pub const fn edit_button_label(&self) -> &'static str {
        if self.editing { SAVE_LABEL } else { EDIT_LABEL }
    }

    /// The focused field, if any. [`Field::Tags`] is the tag input.
    #[must_use]
    pub const fn focus(&self) -> Option<Field> {
        self.focus
    }

    /// Form values.
    #[must_use]
    pub const fn form(&self) -> &EditForm {
        &self.form
    }

    /// Form values, for typing into.
    pub const fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    /// Tag widget.
    #[must_use]
    pub const fn tags(&self) -> &TagInput {
        &self.tags
    }

    /// Tag widget, for typing into.
    pub const fn tags_mut(&mut self) -> &mut TagInput {
        &mut self.tags
    }

    /// Forwards a key press to the tag input.
    pub fn tag_key(&mut self, key: TagKey) {
        self.tags.handle_key(key);
    }

    /// Handles a click in the tag area.
    ///
    /// The container background focuses the tag input; a pill's remove
    /// control removes that tag; the pill body does nothing.
    pub fn click_tag_area(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Container => self.focus = Some(Field::Tags),
            ClickTarget::RemovePill(index) => {
                self.tags.remove(index);
            }
            ClickTarget::Pill(_) => {}
        }
    }

    /// Handles the edit button.
    ///
    /// Outside edit mode this turns edit mode on and focuses the title. In
    /// edit mode it submits, returning the outcome. With no task open it
    /// does nothing.
    pub async fn click_edit(&mut self) -> Option<SubmitOutcome> {
        self.task.as_ref()?;
        if self.editing {
            Some(self.submit().await)
        } else {
            self.set_edit_mode(true);
            self.focus = Some(Field::Title);
            None
        }
    }

    /// Leaves edit mode without saving. Form values are kept.
    pub fn exit_edit_mode(&mut self) {
        self.set_edit_mode(false);
    }

    /// The payload a submit would send right now.
    #[must_use]
    pub fn payload(&self) -> TaskPayload {
        self.form.to_payload(self.tags.tags())
    }

    /// Validates the form and, if valid, sends the update.
    ///
    /// On a 200 reply the message is the server's (or [`SAVED_MESSAGE`]),
    /// edit mode ends and the task is re-fetched so the detail view shows
    /// the stored record. Any other reply or a transport failure keeps
    /// edit mode on.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(id) = self.task.as_ref().map(|t| t.id.clone()) else {
            return SubmitOutcome::NoSelection;
        };

        let payload = self.payload();
        if let Err(e) = validate::validate_payload(&payload) {
            tracing::debug!(task_id = %id, error = %e, "edit form rejected");
            self.focus = Some(e.field());
            return SubmitOutcome::Invalid(e);
        }

        let raw = match self.api.update_task(&id, &payload).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "task update request failed");
                return SubmitOutcome::Failed {
                    message: SAVE_FAILED_MESSAGE.to_string(),
                };
            }
        };

        let reply = raw.reply();
        if !raw.is_ok() {
            tracing::info!(task_id = %id, status = raw.status, "task update refused");
            return SubmitOutcome::Failed {
                message: reply
                    .message
                    .unwrap_or_else(|| SAVE_FAILED_MESSAGE.to_string()),
            };
        }

        let message = reply.message.unwrap_or_else(|| SAVED_MESSAGE.to_string());
        self.set_edit_mode(false);
        match self.api.fetch_task(&id).await {
            Ok(fresh) => self.open(fresh),
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "could not re-fetch updated task");
                if let Some(task) = reply.task {
                    self.open(task);
                }
            }
        }
        tracing::info!(task_id = %id, "task saved");
        SubmitOutcome::Saved { message }
    }

    const fn set_edit_mode(&mut self, editing: bool) {
        self.editing = editing;
    }
}
