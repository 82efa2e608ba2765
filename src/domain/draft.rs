//! Client-held note drafts and their validated form.

use crate::domain::validation::{Field, NOTE_SCHEMA, TAG_ONE_OF_MESSAGE, ValidationErrors};
use crate::domain::NoteTag;
use serde::{Deserialize, Serialize};

/// An unsaved note payload as typed into the creation form.
///
/// All fields are raw strings so that any user input, including tags outside
/// the known set, can be held and then reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for CreateNoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

impl CreateNoteDraft {
    /// Creates a draft from already-typed values.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag: tag.into(),
        }
    }

    /// Returns the raw value of `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
            Field::Tag => &self.tag,
        }
    }

    /// Checks the draft against [`NOTE_SCHEMA`].
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<ValidDraft, ValidationErrors> {
        NOTE_SCHEMA.evaluate(|field| self.value(field))?;
        let tag = self
            .tag
            .parse::<NoteTag>()
            .map_err(|_| ValidationErrors::single(Field::Tag, TAG_ONE_OF_MESSAGE))?;
        Ok(ValidDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            tag,
        })
    }
}

/// A draft that passed the schema.
///
/// Only [`CreateNoteDraft::validate`] can build one, and it is the only type
/// the transport accepts for creation. Serializes to the `POST /notes` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidDraft {
    title: String,
    content: String,
    tag: NoteTag,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tag(&self) -> NoteTag {
        self.tag
    }
}
