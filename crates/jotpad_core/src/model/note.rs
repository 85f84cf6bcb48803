//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record (id, title, body, timestamp).
//! - Provide draft construction and input validation.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first save.
//! - `date` is always a `%Y-%m-%d %H:%M` formatted local timestamp.
//! - A note with neither a non-blank title nor a non-blank body is invalid.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Format of the `date` column, chosen for human-readable list rendering.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Row identifier assigned by the store (`INTEGER PRIMARY KEY`).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Validation failure for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Both title and body are missing or blank.
    EmptyNote,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note requires a non-empty title or body"),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical persisted note record.
///
/// Title and body are individually optional; validation only requires that
/// at least one of them carries visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier. `None` for unsaved drafts.
    pub id: Option<NoteId>,
    /// Optional short heading.
    pub title: Option<String>,
    /// Optional free-form text. Serialized as `note` to match the stored
    /// column name.
    #[serde(rename = "note")]
    pub body: Option<String>,
    /// String-formatted local timestamp of the last save.
    pub date: String,
}

impl Note {
    /// Creates an unsaved draft stamped with the current local time.
    ///
    /// Blank title/body inputs are normalized to `None` so that the empty
    /// check has a single representation.
    pub fn draft(title: Option<String>, body: Option<String>) -> Self {
        Self {
            id: None,
            title: normalize_field(title),
            body: normalize_field(body),
            date: current_timestamp(),
        }
    }

    /// Checks that this note carries visible text.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.is_none() && self.body.is_none() {
            return Err(NoteValidationError::EmptyNote);
        }
        Ok(())
    }

    /// Replaces title and body in place and refreshes the timestamp.
    ///
    /// The identifier is intentionally untouched: edits mutate the same
    /// stored row.
    pub fn apply_edit(&mut self, title: Option<String>, body: Option<String>) {
        self.title = normalize_field(title);
        self.body = normalize_field(body);
        self.date = current_timestamp();
    }
}

/// Returns the current local time formatted for the `date` column.
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn normalize_field(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{current_timestamp, Note, NoteValidationError};

    #[test]
    fn draft_normalizes_blank_fields_to_none() {
        let note = Note::draft(Some("   ".to_string()), Some("body".to_string()));
        assert_eq!(note.title, None);
        assert_eq!(note.body.as_deref(), Some("body"));
        assert_eq!(note.id, None);
    }

    #[test]
    fn validate_rejects_note_without_text() {
        let note = Note::draft(None, Some("  ".to_string()));
        assert_eq!(note.validate(), Err(NoteValidationError::EmptyNote));
    }

    #[test]
    fn validate_accepts_title_only_note() {
        let note = Note::draft(Some("groceries".to_string()), None);
        assert!(note.validate().is_ok());
    }

    #[test]
    fn apply_edit_keeps_id_and_refreshes_fields() {
        let mut note = Note::draft(Some("old".to_string()), None);
        note.id = Some(7);
        note.apply_edit(Some("new".to_string()), Some("text".to_string()));

        assert_eq!(note.id, Some(7));
        assert_eq!(note.title.as_deref(), Some("new"));
        assert_eq!(note.body.as_deref(), Some("text"));
    }

    #[test]
    fn timestamp_matches_expected_shape() {
        let stamp = current_timestamp();
        // %Y-%m-%d %H:%M renders as 16 chars with fixed separators.
        assert_eq!(stamp.len(), 16);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
    }

    #[test]
    fn note_serializes_body_as_note_field() {
        let note = Note::draft(Some("t".to_string()), Some("b".to_string()));
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["note"], "b");
        assert!(json.get("body").is_none());
    }
}
