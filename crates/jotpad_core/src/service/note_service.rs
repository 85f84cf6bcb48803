//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/edit/get/list/search/delete entry points for callers.
//! - Stamp timestamps on every write and reject empty input up front.
//!
//! # Invariants
//! - Edits preserve the identifier and refresh title/body/timestamp.
//! - Search is the in-memory filter applied to the full list.
//! - Service APIs never bypass repository validation contracts.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use crate::search::filter::filter_notes;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Both title and body were missing or blank.
    EmptyInput,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "note requires a non-empty title or body"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(_) => Self::EmptyInput,
            other => Self::Repo(other),
        }
    }
}

/// Use-case facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note, stamping the current timestamp.
    ///
    /// Returns the stored note including its assigned identifier.
    pub fn create_note(
        &self,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Note, NoteServiceError> {
        let draft = Note::draft(title, body);
        draft.validate().map_err(|_| NoteServiceError::EmptyInput)?;

        let id = self.repo.insert_note(&draft)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title and body of an existing note with a fresh timestamp.
    ///
    /// The identifier is preserved; unknown ids surface as `NoteNotFound`.
    pub fn update_note(
        &self,
        id: NoteId,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        note.apply_edit(title, body);
        note.validate().map_err(|_| NoteServiceError::EmptyInput)?;
        self.repo.update_note(&note)?;

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Gets one note by identifier.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists all notes newest-first.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.list_notes()
    }

    /// Lists notes matching a free-text query.
    ///
    /// A blank query behaves like `list_notes`.
    pub fn search_notes(&self, query: &str) -> RepoResult<Vec<Note>> {
        let notes = self.repo.list_notes()?;
        Ok(filter_notes(&notes, query))
    }

    /// Deletes one note by identifier.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        Ok(())
    }
}
