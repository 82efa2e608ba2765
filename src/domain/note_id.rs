//! Opaque, server-assigned note identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A note identifier as handed out by the notes API.
///
/// The client never interprets the value; it only echoes it back in
/// `DELETE /notes/{id}`. Some deployments send numeric ids, so deserialization
/// accepts both JSON strings and integers and stores the textual form.
///
/// # Examples
///
/// ```
/// use notehub::domain::NoteId;
///
/// let id: NoteId = "65a1f0c2e4b0".parse().unwrap();
/// assert_eq!(id.as_str(), "65a1f0c2e4b0");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NoteId(String);

/// Error returned when parsing an empty or malformed identifier.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
    reason: &'static str,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseNoteIdError {}

impl NoteId {
    /// Returns the identifier as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short prefix for compact listings.
    pub fn prefix(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id cannot be empty",
            });
        }
        // Ids are interpolated into the request path.
        if trimmed.contains(['/', '?', '#']) || trimmed.contains(char::is_whitespace) {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id cannot contain '/', '?', '#' or whitespace",
            });
        }
        Ok(NoteId(trimmed.to_string()))
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNoteId {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawNoteId::deserialize(deserializer)? {
            RawNoteId::Text(s) => s.parse().map_err(serde::de::Error::custom),
            RawNoteId::Number(n) => Ok(NoteId(n.to_string())),
        }
    }
}
