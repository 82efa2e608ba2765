//! Declarative validation schema for note drafts.
//!
//! The schema is plain data: a list of `(field, rule, message)` triples that
//! is evaluated in order. Only the first failing rule of each field is
//! reported, so a field never shows more than one message at a time.

use std::fmt;
use thiserror::Error;

/// A draft field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Content,
    Tag,
}

impl Field {
    /// Returns the field's name as used in form-level messages.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::Tag => "tag",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A predicate over a field's raw string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be non-empty.
    Required,
    /// Value must have at least this many characters.
    MinChars(usize),
    /// Value must have at most this many characters.
    MaxChars(usize),
    /// Value must equal one of the listed strings exactly.
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Returns true if `value` satisfies the rule.
    ///
    /// Lengths count Unicode scalar values; nothing is trimmed.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MinChars(min) => value.chars().count() >= *min,
            Rule::MaxChars(max) => value.chars().count() <= *max,
            Rule::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

/// A single schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub rule: Rule,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: Field, rule: Rule, message: &'static str) -> Self {
        Self {
            field,
            rule,
            message,
        }
    }
}

/// An ordered rule set evaluated against field values.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Returns the schema's rules in evaluation order.
    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Evaluates every rule, looking field values up through `value_of`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` holding the first failing message of each
    /// field that failed.
    pub fn evaluate<'a>(
        &self,
        value_of: impl Fn(Field) -> &'a str,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for entry in self.rules {
            if errors.get(entry.field).is_some() {
                continue;
            }
            if !entry.rule.check(value_of(entry.field)) {
                errors.push(FieldError {
                    field: entry.field,
                    message: entry.message,
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

const NOTE_RULES: &[FieldRule] = &[
    FieldRule::new(Field::Title, Rule::Required, "Required"),
    FieldRule::new(Field::Title, Rule::MinChars(3), "Min 3 characters"),
    FieldRule::new(Field::Title, Rule::MaxChars(50), "Max 50 characters"),
    FieldRule::new(Field::Content, Rule::MaxChars(500), "Max 500 characters"),
    FieldRule::new(Field::Tag, Rule::Required, "Required"),
    FieldRule::new(
        Field::Tag,
        Rule::OneOf(&crate::domain::NoteTag::NAMES),
        TAG_ONE_OF_MESSAGE,
    ),
];

pub(crate) const TAG_ONE_OF_MESSAGE: &str =
    "tag must be one of the following values: Todo, Work, Personal, Meeting, Shopping";

/// The schema a note draft must pass before it may be submitted.
pub const NOTE_SCHEMA: Schema = Schema::new(NOTE_RULES);

/// A message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field errors that block a draft from being submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid note: {}", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Errors consisting of a single field message.
    pub(crate) fn single(field: Field, message: &'static str) -> Self {
        Self {
            errors: vec![FieldError { field, message }],
        }
    }

    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Returns the message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// Returns all field errors in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
