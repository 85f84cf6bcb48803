//! Core domain logic for jotpad.
//! This crate is the single source of truth for note business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod worker;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{current_timestamp, Note, NoteId, NoteValidationError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use search::filter::{filter_notes, note_matches};
pub use service::note_service::{NoteService, NoteServiceError};
pub use worker::note_worker::{NoteCommand, NoteWorker, NotesSnapshot, WorkerError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
