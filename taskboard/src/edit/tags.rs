//! Tag entry widget state.
//!
//! Holds the tags being edited plus the text currently typed into the tag
//! input. The tag list never contains two exactly-equal entries.

/// Keys the tag input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey {
    /// Commits the typed text as a new tag.
    Enter,
    /// Deletes the last typed character, or the last tag when nothing is
    /// typed.
    Backspace,
}

/// Tag list and pending input of the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInput {
    tags: Vec<String>,
    input: String,
}

impl TagInput {
    /// Creates an empty widget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tag list and clears the input.
    ///
    /// Repeated entries keep their first occurrence only.
    pub fn replace(&mut self, tags: impl IntoIterator<Item = String>) {
        self.tags.clear();
        self.input.clear();
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
    }

    /// Current tags, oldest first.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Text currently typed into the input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Sets the typed text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Appends one typed character.
    pub fn type_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Applies a key press.
    ///
    /// `Enter` adds the trimmed input if it is non-empty and not already a
    /// tag, then clears the input in every case. `Backspace` on an empty
    /// input removes the most recent tag.
    pub fn handle_key(&mut self, key: TagKey) {
        match key {
            TagKey::Enter => {
                let candidate = self.input.trim();
                if !candidate.is_empty() && !self.tags.iter().any(|t| t == candidate) {
                    self.tags.push(candidate.to_string());
                }
                self.input.clear();
            }
            TagKey::Backspace => {
                if self.input.is_empty() {
                    self.tags.pop();
                } else {
                    self.input.pop();
                }
            }
        }
    }

    /// Removes the tag at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }
}
