//! Rm command handler.

use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::RmArgs;
use crate::domain::NoteId;
use crate::transport::NoteTransport;

/// Handle the `rm` command.
pub fn handle_rm(args: &RmArgs, transport: &dyn NoteTransport, out: &mut dyn Write) -> Result<()> {
    let id: NoteId = args.id.parse()?;

    let deleted = transport
        .delete_note(&id)
        .with_context(|| format!("failed to delete note {}", id))?;

    match deleted {
        Some(note) => writeln!(out, "Deleted: {} [{}]", note.title(), note.id().prefix())?,
        None => writeln!(out, "Deleted: {}", id)?,
    }
    Ok(())
}
