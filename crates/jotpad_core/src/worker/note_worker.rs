//! Single-threaded note worker with a push-based list feed.
//!
//! # Responsibility
//! - Own one SQLite connection on a dedicated thread.
//! - Apply create/update/delete commands from an unbounded queue.
//! - Broadcast `Arc<Vec<Note>>` snapshots to every live subscriber.
//!
//! # Invariants
//! - A subscriber receives the current snapshot immediately on subscribe.
//! - Every mutation attempt is followed by a broadcast, even when the
//!   mutation itself failed (the view re-renders from stored truth).
//! - Command failures are logged at the point of occurrence; there is no
//!   retry and no error channel back to the producer.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::service::note_service::{NoteService, NoteServiceError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

const WORKER_THREAD_NAME: &str = "jotpad-note-worker";

/// Immutable note-list snapshot delivered to feed subscribers.
pub type NotesSnapshot = Arc<Vec<Note>>;

/// Commands accepted by the worker queue.
#[derive(Debug)]
pub enum NoteCommand {
    Create {
        title: Option<String>,
        body: Option<String>,
    },
    Update {
        id: NoteId,
        title: Option<String>,
        body: Option<String>,
    },
    Delete {
        id: NoteId,
    },
    /// Re-reads storage and broadcasts without mutating anything.
    Refresh,
    /// Registers a feed subscriber; the current snapshot is sent at once.
    Subscribe(Sender<NotesSnapshot>),
    Shutdown,
}

/// Worker lifecycle and submission errors.
#[derive(Debug)]
pub enum WorkerError {
    Db(DbError),
    Spawn(std::io::Error),
    /// The worker thread has already shut down.
    Disconnected,
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "failed to spawn worker thread: {err}"),
            Self::Disconnected => write!(f, "note worker is no longer running"),
        }
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::Disconnected => None,
        }
    }
}

impl From<DbError> for WorkerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Handle to the background note worker.
///
/// Dropping the handle shuts the worker down best-effort; call
/// [`NoteWorker::shutdown`] to drain it deterministically.
pub struct NoteWorker {
    commands: Sender<NoteCommand>,
    handle: Option<JoinHandle<()>>,
}

impl NoteWorker {
    /// Spawns a worker over a file-backed database.
    ///
    /// The connection is opened (and migrated) before the thread starts, so
    /// open failures surface to the caller instead of dying in background.
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self, WorkerError> {
        let conn = open_db(path)?;
        Self::spawn_with_connection(conn)
    }

    /// Spawns a worker over a private in-memory database.
    pub fn spawn_in_memory() -> Result<Self, WorkerError> {
        let conn = open_db_in_memory()?;
        Self::spawn_with_connection(conn)
    }

    fn spawn_with_connection(conn: Connection) -> Result<Self, WorkerError> {
        let (commands, queue) = unbounded();
        let handle = Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(conn, queue))
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            commands,
            handle: Some(handle),
        })
    }

    /// Registers a feed subscriber and returns its snapshot receiver.
    ///
    /// The first message is the current note list.
    pub fn subscribe(&self) -> Result<Receiver<NotesSnapshot>, WorkerError> {
        let (tx, rx) = unbounded();
        self.send(NoteCommand::Subscribe(tx))?;
        Ok(rx)
    }

    /// Queues a note creation.
    pub fn create(&self, title: Option<String>, body: Option<String>) -> Result<(), WorkerError> {
        self.send(NoteCommand::Create { title, body })
    }

    /// Queues an edit of an existing note.
    pub fn update(
        &self,
        id: NoteId,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<(), WorkerError> {
        self.send(NoteCommand::Update { id, title, body })
    }

    /// Queues a deletion.
    pub fn delete(&self, id: NoteId) -> Result<(), WorkerError> {
        self.send(NoteCommand::Delete { id })
    }

    /// Queues a read-only feed refresh.
    pub fn refresh(&self) -> Result<(), WorkerError> {
        self.send(NoteCommand::Refresh)
    }

    /// Submits an arbitrary command to the queue.
    pub fn send(&self, command: NoteCommand) -> Result<(), WorkerError> {
        self.commands
            .send(command)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Stops the worker and joins its thread.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let _ = self.commands.send(NoteCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for NoteWorker {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run_worker(conn: Connection, queue: Receiver<NoteCommand>) {
    info!("event=worker_start module=worker status=ok thread={WORKER_THREAD_NAME}");
    let mut subscribers: Vec<Sender<NotesSnapshot>> = Vec::new();

    for command in queue.iter() {
        match command {
            NoteCommand::Subscribe(tx) => {
                let snapshot = load_snapshot(&conn);
                if tx.send(snapshot).is_ok() {
                    subscribers.push(tx);
                }
            }
            NoteCommand::Create { title, body } => {
                if let Some(service) = ready_service(&conn, "create") {
                    log_write_result("create", service.create_note(title, body).map(|_| ()));
                }
                broadcast(&conn, &mut subscribers);
            }
            NoteCommand::Update { id, title, body } => {
                if let Some(service) = ready_service(&conn, "update") {
                    log_write_result("update", service.update_note(id, title, body).map(|_| ()));
                }
                broadcast(&conn, &mut subscribers);
            }
            NoteCommand::Delete { id } => {
                if let Some(service) = ready_service(&conn, "delete") {
                    log_write_result("delete", service.delete_note(id));
                }
                broadcast(&conn, &mut subscribers);
            }
            NoteCommand::Refresh => {
                broadcast(&conn, &mut subscribers);
            }
            NoteCommand::Shutdown => break,
        }
    }

    info!("event=worker_stop module=worker status=ok thread={WORKER_THREAD_NAME}");
}

fn ready_service<'conn>(
    conn: &'conn Connection,
    op: &str,
) -> Option<NoteService<SqliteNoteRepository<'conn>>> {
    match SqliteNoteRepository::try_new(conn) {
        Ok(repo) => Some(NoteService::new(repo)),
        Err(err) => {
            error!("event=worker_write module=worker status=error op={op} error={err}");
            None
        }
    }
}

fn log_write_result(op: &str, result: Result<(), NoteServiceError>) {
    // No recovery path: the failure is logged and the feed re-renders from
    // whatever state storage is actually in.
    if let Err(err) = result {
        error!("event=worker_write module=worker status=error op={op} error={err}");
    }
}

fn broadcast(conn: &Connection, subscribers: &mut Vec<Sender<NotesSnapshot>>) {
    let snapshot = load_snapshot(conn);
    subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
}

fn load_snapshot(conn: &Connection) -> NotesSnapshot {
    let notes = SqliteNoteRepository::try_new(conn)
        .and_then(|repo| repo.list_notes())
        .unwrap_or_else(|err| {
            warn!("event=worker_snapshot module=worker status=error error={err}");
            Vec::new()
        });

    Arc::new(notes)
}
