//! Core types: Note, NoteId, NoteTag, NotesPage, drafts and their validation schema

mod draft;
mod note;
mod note_id;
mod tag;
mod validation;

pub use draft::{CreateNoteDraft, ValidDraft};
pub use note::{Note, NotesPage};
pub use note_id::{NoteId, ParseNoteIdError};
pub use tag::{NoteTag, ParseTagError};
pub use validation::{Field, FieldError, FieldRule, NOTE_SCHEMA, Rule, Schema, ValidationErrors};
