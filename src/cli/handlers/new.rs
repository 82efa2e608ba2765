//! New command handler.

use std::io::Write;

use anyhow::{Result, bail};

use super::{note_json, write_field_errors};
use crate::cli::NewArgs;
use crate::cli::output::OutputFormat;
use crate::domain::CreateNoteDraft;
use crate::session::{CreationWorkflow, QueryCache, SubmitError};
use crate::transport::NoteTransport;

/// Handle the `new` command.
///
/// The draft goes through the same form workflow as the interactive list, so
/// a draft failing the schema is reported field by field and never sent.
pub fn handle_new(args: &NewArgs, transport: &dyn NoteTransport, out: &mut dyn Write) -> Result<()> {
    let mut cache = QueryCache::new();
    let mut workflow = CreationWorkflow::new();
    workflow.open();
    if let Some(draft) = workflow.draft_mut() {
        *draft = CreateNoteDraft::new(
            args.title.as_str(),
            args.content.clone().unwrap_or_default(),
            args.tag.as_str(),
        );
    }

    let note = match workflow.submit(transport, &mut cache) {
        Ok(note) => note,
        Err(SubmitError::Invalid(errors)) => {
            writeln!(out, "Note not created:")?;
            write_field_errors(out, &errors)?;
            bail!(errors);
        }
        Err(err) => return Err(err.into()),
    };

    match args.format {
        OutputFormat::Human => {
            writeln!(out, "Created: {} [{}]", note.title(), note.id().prefix())?;
            writeln!(out, "  tag: {}", note.tag())?;
        }
        OutputFormat::Json => writeln!(out, "{}", note_json(&note)?)?,
    }

    Ok(())
}
