//! Browse command handler: a line-oriented interactive list.
//!
//! Plain lines replace the search box text and settle after the debounce
//! window. Lines starting with `:` are commands, see [`HELP`].

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use log::debug;

use super::{write_field_errors, write_view};
use crate::cli::output::OutputFormat;
use crate::domain::{Field, NoteId};
use crate::session::{BrowserOptions, ListView, NotesBrowser, SubmitError};
use crate::transport::NoteTransport;

const HELP: &str = "\
Commands:
  <text>        search notes (empty line clears the search)
  :n / :p       next / previous page
  :page N       go to page N
  :r            retry after an error
  :new          open the new note form
  :title T      set the title
  :content C    set the content
  :tag G        set the tag (Todo, Work, Personal, Meeting, Shopping)
  :save         create the note
  :cancel       discard the form
  :rm ID        delete a note
  :h / :help    show this help
  :q            quit";

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session over a transport.
pub struct BrowseSession<'t> {
    browser: NotesBrowser,
    transport: &'t dyn NoteTransport,
}

impl<'t> BrowseSession<'t> {
    pub fn new(transport: &'t dyn NoteTransport, options: BrowserOptions) -> Self {
        Self {
            browser: NotesBrowser::new(options),
            transport,
        }
    }

    pub fn browser(&self) -> &NotesBrowser {
        &self.browser
    }

    /// Returns when the loop must wake up to settle pending search input.
    pub fn deadline(&self) -> Option<Instant> {
        self.browser.search_deadline()
    }

    /// Loads and shows the first page.
    pub fn start(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Type to search, :help for commands.")?;
        self.reload(out)
    }

    /// Settles the search once its window has passed.
    pub fn tick(&mut self, now: Instant, out: &mut dyn Write) -> Result<()> {
        if self.browser.poll(now) {
            self.reload(out)?;
        }
        Ok(())
    }

    /// Settles any pending search input at end of input.
    pub fn finish(&mut self, out: &mut dyn Write) -> Result<()> {
        if self.browser.flush_search() {
            self.reload(out)?;
        }
        Ok(())
    }

    /// Handles one line of input.
    pub fn handle_line(&mut self, line: &str, now: Instant, out: &mut dyn Write) -> Result<Flow> {
        let line = line.trim_end_matches('\r');
        if !line.starts_with(':') {
            if self.browser.creation().is_open() {
                writeln!(out, "Finish the form with :save or :cancel first.")?;
            } else {
                self.browser.type_search(line, now);
            }
            return Ok(Flow::Continue);
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim_start()),
            None => (line, ""),
        };
        debug!("browse command {} {:?}", command, arg);

        match command {
            ":q" | ":quit" => return Ok(Flow::Quit),
            ":help" | ":h" => writeln!(out, "{}", HELP)?,
            ":n" | ":next" => match self.browser.next_page() {
                Ok(()) => self.reload(out)?,
                Err(err) => writeln!(out, "{}", err)?,
            },
            ":p" | ":prev" => match self.browser.prev_page() {
                Ok(()) => self.reload(out)?,
                Err(err) => writeln!(out, "{}", err)?,
            },
            ":page" => match arg.parse::<u32>() {
                Ok(page) => match self.browser.set_page(page) {
                    Ok(()) => self.reload(out)?,
                    Err(err) => writeln!(out, "{}", err)?,
                },
                Err(_) => writeln!(out, "Usage: :page N")?,
            },
            ":r" | ":retry" => {
                self.browser.retry();
                self.reload(out)?;
            }
            ":new" => {
                self.browser.open_create();
                self.write_form(out)?;
            }
            ":title" | ":content" | ":tag" => self.edit_field(command, arg, out)?,
            ":save" => self.save(out)?,
            ":cancel" => {
                if self.browser.creation().is_open() {
                    self.browser.cancel_create();
                    writeln!(out, "Discarded.")?;
                } else {
                    writeln!(out, "No note form is open.")?;
                }
            }
            ":rm" => self.delete(arg, out)?,
            other => writeln!(out, "Unknown command: {} (try :help)", other)?,
        }
        Ok(Flow::Continue)
    }

    fn edit_field(&mut self, command: &str, value: &str, out: &mut dyn Write) -> Result<()> {
        let Some(draft) = self.browser.creation_mut().draft_mut() else {
            writeln!(out, "No note form is open (use :new).")?;
            return Ok(());
        };
        match command {
            ":title" => draft.title = value.to_string(),
            ":content" => draft.content = value.to_string(),
            _ => draft.tag = value.to_string(),
        }
        self.write_form(out)
    }

    fn save(&mut self, out: &mut dyn Write) -> Result<()> {
        match self.browser.submit_create(self.transport) {
            Ok(note) => {
                writeln!(out, "Created: {} [{}]", note.title(), note.id().prefix())?;
                self.reload(out)?;
            }
            Err(SubmitError::Invalid(errors)) => {
                writeln!(out, "Note not created:")?;
                write_field_errors(out, &errors)?;
            }
            Err(err) => writeln!(out, "Error: {}", err)?,
        }
        Ok(())
    }

    fn delete(&mut self, arg: &str, out: &mut dyn Write) -> Result<()> {
        let id: NoteId = match arg.parse() {
            Ok(id) => id,
            Err(err) => {
                writeln!(out, "{}", err)?;
                return Ok(());
            }
        };
        match self.browser.delete(self.transport, &id) {
            Ok(_) => {
                writeln!(out, "Deleted: {}", id)?;
                self.reload(out)?;
            }
            Err(err) => writeln!(out, "Error: {}", err)?,
        }
        Ok(())
    }

    fn write_form(&self, out: &mut dyn Write) -> Result<()> {
        let creation = self.browser.creation();
        let draft = creation.draft();
        writeln!(out, "New note")?;
        for field in [Field::Title, Field::Content, Field::Tag] {
            writeln!(out, "  {:<8} {}", format!("{}:", field), draft.value(field))?;
        }
        writeln!(out, "Set fields with :title, :content, :tag; then :save or :cancel.")?;
        Ok(())
    }

    /// Fetches what the current key needs and shows the list.
    fn reload(&mut self, out: &mut dyn Write) -> Result<()> {
        self.browser.refresh(self.transport);

        let search = self.browser.search().settled();
        if !search.is_empty() {
            writeln!(out, "Search: {:?}", search)?;
        }
        match self.browser.view() {
            ListView::Failed {
                message,
                previous: None,
            } => writeln!(out, "Error: {} (:r to retry)", message)?,
            view => write_view(out, &view, search, OutputFormat::Human)?,
        }
        Ok(())
    }
}

/// Handle the `browse` command.
///
/// Stdin is read on its own thread so the loop can wake up when the search
/// debounce window closes without waiting for the next line.
pub fn handle_browse(
    transport: &dyn NoteTransport,
    options: BrowserOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut session = BrowseSession::new(transport, options);
    session.start(out)?;
    out.flush()?;

    loop {
        let line = match session.deadline() {
            Some(deadline) => {
                match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        if let Some(line) = line {
            if session.handle_line(&line, Instant::now(), out)? == Flow::Quit {
                out.flush()?;
                return Ok(());
            }
        }
        session.tick(Instant::now(), out)?;
        out.flush()?;
    }

    session.finish(out)?;
    out.flush()?;
    Ok(())
}
