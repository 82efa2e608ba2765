//! Note creation workflow.
//!
//! A form hosted in a modal surface:
//!
//! ```text
//! Closed --open--> Editing --begin_submit--> Submitting --Ok--> Closed
//!                    ^  |                        |
//!                    |  +-- invalid (stays) -----+--Err--> Editing
//!                    +---------- cancel --> Closed
//! ```
//!
//! On success the draft is discarded, the modal closes and the query cache is
//! invalidated, all inside one `finish_submit` call. On a transport failure
//! the draft is kept as typed and the form goes back to editing.

use log::{info, warn};
use thiserror::Error;

use super::QueryCache;
use crate::domain::{CreateNoteDraft, Note, ValidDraft, ValidationErrors};
use crate::transport::{NoteTransport, TransportError, TransportResult};

/// Where the creation form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No form is shown.
    Closed,
    /// The form is open and the draft can be changed.
    Editing,
    /// The draft is locked while the create request is in flight.
    Submitting,
}

/// Why a submission did not produce a note.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft failed the schema; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The server or network rejected the request; the draft is kept.
    #[error("failed to create note: {0}")]
    Transport(#[from] TransportError),

    /// Submit was called while no draft was being edited.
    #[error("no note form is open for editing")]
    NotEditing,
}

/// The creation form and its draft.
#[derive(Debug, Clone)]
pub struct CreationWorkflow {
    state: WorkflowState,
    draft: CreateNoteDraft,
    field_errors: Option<ValidationErrors>,
    form_error: Option<String>,
}

impl Default for CreationWorkflow {
    fn default() -> Self {
        Self {
            state: WorkflowState::Closed,
            draft: CreateNoteDraft::default(),
            field_errors: None,
            form_error: None,
        }
    }
}

impl CreationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Returns true while the hosting modal is shown.
    pub fn is_open(&self) -> bool {
        self.state != WorkflowState::Closed
    }

    /// Opens the form with a fresh draft. Does nothing if already open.
    pub fn open(&mut self) {
        if self.state == WorkflowState::Closed {
            self.draft = CreateNoteDraft::default();
            self.field_errors = None;
            self.form_error = None;
            self.state = WorkflowState::Editing;
        }
    }

    /// Discards the draft and closes the form.
    ///
    /// Ignored while a submission is in flight.
    pub fn cancel(&mut self) {
        if self.state == WorkflowState::Editing {
            self.close();
        }
    }

    fn close(&mut self) {
        self.state = WorkflowState::Closed;
        self.draft = CreateNoteDraft::default();
        self.field_errors = None;
        self.form_error = None;
    }

    /// Returns the draft as currently typed.
    pub fn draft(&self) -> &CreateNoteDraft {
        &self.draft
    }

    /// Returns the draft for editing, or `None` unless the form is editable.
    pub fn draft_mut(&mut self) -> Option<&mut CreateNoteDraft> {
        if self.state == WorkflowState::Editing {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    /// Returns the field messages of the last rejected submission.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    /// Returns the form-level message of the last failed request.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Validates the draft and locks it for submission.
    ///
    /// # Errors
    ///
    /// - `SubmitError::NotEditing` unless the form is in the editing state
    /// - `SubmitError::Invalid` if any field fails; the form stays editable
    pub fn begin_submit(&mut self) -> Result<ValidDraft, SubmitError> {
        if self.state != WorkflowState::Editing {
            return Err(SubmitError::NotEditing);
        }
        match self.draft.validate() {
            Ok(valid) => {
                self.field_errors = None;
                self.form_error = None;
                self.state = WorkflowState::Submitting;
                Ok(valid)
            }
            Err(errors) => {
                self.field_errors = Some(errors.clone());
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Applies the outcome of the create request.
    ///
    /// # Errors
    ///
    /// - `SubmitError::NotEditing` if no submission is in flight
    /// - `SubmitError::Transport` if the request failed; the form returns to
    ///   editing with the draft intact
    pub fn finish_submit(
        &mut self,
        result: TransportResult<Note>,
        cache: &mut QueryCache,
    ) -> Result<Note, SubmitError> {
        if self.state != WorkflowState::Submitting {
            return Err(SubmitError::NotEditing);
        }
        match result {
            Ok(note) => {
                self.close();
                cache.invalidate_all();
                info!("created note {} ({})", note.id(), note.title());
                Ok(note)
            }
            Err(err) => {
                warn!("note creation failed: {}", err);
                self.state = WorkflowState::Editing;
                self.form_error = Some(err.to_string());
                Err(SubmitError::Transport(err))
            }
        }
    }

    /// Validates, sends and applies the result in one step.
    ///
    /// # Errors
    ///
    /// See [`CreationWorkflow::begin_submit`] and
    /// [`CreationWorkflow::finish_submit`].
    pub fn submit(
        &mut self,
        transport: &dyn NoteTransport,
        cache: &mut QueryCache,
    ) -> Result<Note, SubmitError> {
        let valid = self.begin_submit()?;
        let result = transport.create_note(&valid);
        self.finish_submit(result, cache)
    }
}
