//! Terminal front-end for jotpad.
//!
//! # Responsibility
//! - Map subcommands onto core use-cases.
//! - Route writes through the background worker and re-render the list
//!   from its feed; serve reads synchronously.

use clap::{Parser, Subcommand};
use jotpad_core::db::open_db;
use jotpad_core::{
    default_log_level, init_logging, Note, NoteId, NoteService, NoteWorker, SqliteNoteRepository,
    WorkerError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

const FEED_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "jotpad", version, about = "Single-device note taking")]
struct Cli {
    /// Database file.
    #[arg(long, env = "JOTPAD_DB", default_value = "jotpad.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging stays off when
    /// unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a note.
    Add {
        /// Optional short heading.
        #[arg(long)]
        title: Option<String>,
        /// Free-form note text.
        body: Option<String>,
    },
    /// List all notes newest-first.
    List,
    /// Case-insensitive substring search across titles and bodies.
    Search { query: String },
    /// Show one note in full.
    Show { id: NoteId },
    /// Edit a note in place; omitted fields keep their current value.
    Edit {
        id: NoteId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a note.
    Delete { id: NoteId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
        log::info!("event=cli_start module=cli status=ok db={}", cli.db.display());
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Command::Add { title, body } => {
            let draft = Note::draft(title.clone(), body.clone());
            // Mirror of the original empty-input toast: reject before any
            // work is queued.
            draft.validate().map_err(|err| err.to_string())?;
            submit_write(&cli.db, |worker| {
                worker.create(title.clone(), body.clone())
            })
        }
        Command::List => {
            let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
            let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let service = NoteService::new(repo);
            let notes = service.list_notes().map_err(|err| err.to_string())?;
            render_list(&notes);
            Ok(())
        }
        Command::Search { query } => {
            let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
            let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let service = NoteService::new(repo);
            let notes = service.search_notes(query).map_err(|err| err.to_string())?;
            render_list(&notes);
            Ok(())
        }
        Command::Show { id } => {
            let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
            let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let service = NoteService::new(repo);
            let note = service
                .get_note(*id)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("note not found: {id}"))?;
            render_note(&note);
            Ok(())
        }
        Command::Edit { id, title, body } => {
            let current = {
                let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
                let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
                let service = NoteService::new(repo);
                service
                    .get_note(*id)
                    .map_err(|err| err.to_string())?
                    .ok_or_else(|| format!("note not found: {id}"))?
            };

            let next_title = title.clone().or(current.title);
            let next_body = body.clone().or(current.body);
            let merged = Note::draft(next_title.clone(), next_body.clone());
            merged.validate().map_err(|err| err.to_string())?;

            submit_write(&cli.db, |worker| worker.update(*id, next_title, next_body))
        }
        Command::Delete { id } => {
            let exists = {
                let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
                let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
                let service = NoteService::new(repo);
                service
                    .get_note(*id)
                    .map_err(|err| err.to_string())?
                    .is_some()
            };
            if !exists {
                return Err(format!("note not found: {id}"));
            }

            submit_write(&cli.db, |worker| worker.delete(*id))
        }
    }
}

/// Routes one write through the background worker and renders the list its
/// feed emits after the command lands.
fn submit_write(
    db: &Path,
    write: impl FnOnce(&NoteWorker) -> Result<(), WorkerError>,
) -> Result<(), String> {
    let worker = NoteWorker::spawn(db).map_err(|err| err.to_string())?;
    let feed = worker.subscribe().map_err(|err| err.to_string())?;
    feed.recv_timeout(FEED_TIMEOUT)
        .map_err(|_| "feed produced no initial snapshot".to_string())?;

    write(&worker).map_err(|err| err.to_string())?;

    let snapshot = feed
        .recv_timeout(FEED_TIMEOUT)
        .map_err(|_| "feed produced no refreshed snapshot".to_string())?;
    render_list(&snapshot);

    worker.shutdown();
    Ok(())
}

fn render_list(notes: &[Note]) {
    if notes.is_empty() {
        println!("no notes");
        return;
    }

    for note in notes {
        let id = note.id.unwrap_or_default();
        println!("{:>4}  {}  {}", id, note.date, headline(note));
    }
}

fn render_note(note: &Note) {
    let id = note.id.unwrap_or_default();
    println!("id:    {id}");
    println!("date:  {}", note.date);
    if let Some(title) = note.title.as_deref() {
        println!("title: {title}");
    }
    if let Some(body) = note.body.as_deref() {
        println!();
        println!("{body}");
    }
}

/// One-line list rendering: title when present, else the body's first line.
fn headline(note: &Note) -> String {
    if let Some(title) = note.title.as_deref() {
        return title.to_string();
    }
    note.body
        .as_deref()
        .and_then(|body| body.lines().next())
        .unwrap_or("(empty)")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::headline;
    use jotpad_core::Note;

    #[test]
    fn headline_prefers_title_over_body() {
        let note = Note::draft(Some("title".to_string()), Some("body".to_string()));
        assert_eq!(headline(&note), "title");
    }

    #[test]
    fn headline_falls_back_to_first_body_line() {
        let note = Note::draft(None, Some("first line\nsecond line".to_string()));
        assert_eq!(headline(&note), "first line");
    }
}
