//! Linear case-insensitive substring filter over an in-memory note list.
//!
//! # Responsibility
//! - Decide which notes match a free-text query.
//!
//! # Invariants
//! - Matching is case-insensitive and checks both title and body.
//! - A blank query matches everything (the unfiltered list view).
//! - Input ordering is preserved; no ranking is applied.

use crate::model::note::Note;

/// Returns the notes whose title or body contains `query`, preserving the
/// input ordering.
///
/// A blank or whitespace-only query returns the full list unchanged.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return notes.to_vec();
    }

    notes
        .iter()
        .filter(|note| note_matches(note, &needle))
        .cloned()
        .collect()
}

/// Checks one note against an already-lowercased needle.
pub fn note_matches(note: &Note, needle_lower: &str) -> bool {
    field_contains(note.title.as_deref(), needle_lower)
        || field_contains(note.body.as_deref(), needle_lower)
}

fn field_contains(field: Option<&str>, needle_lower: &str) -> bool {
    field
        .map(|text| text.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}
