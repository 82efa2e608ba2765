//! The fixed set of tags a note can carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A note tag from the closed set the API accepts.
///
/// The wire form is the exact variant name (`"Todo"`, `"Work"`, ...). Parsing is
/// case-sensitive, matching the server: `"todo"` is not a tag.
///
/// # Examples
///
/// ```
/// use notehub::domain::NoteTag;
///
/// let tag: NoteTag = "Shopping".parse().unwrap();
/// assert_eq!(tag, NoteTag::Shopping);
/// assert!("Urgent".parse::<NoteTag>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

/// Error returned when parsing a string that is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid tag '{}': expected one of {}",
            self.0,
            NoteTag::NAMES.join(", ")
        )
    }
}

impl std::error::Error for ParseTagError {}

impl NoteTag {
    /// Every tag, in display order.
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    /// Wire names of every tag, in display order.
    pub const NAMES: [&'static str; 5] = ["Todo", "Work", "Personal", "Meeting", "Shopping"];

    /// Returns the wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ParseTagError(s.to_string()))
    }
}
