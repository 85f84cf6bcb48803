use jotpad_core::{NoteWorker, NotesSnapshot};
use crossbeam_channel::Receiver;
use std::time::Duration;

const FEED_TIMEOUT: Duration = Duration::from_secs(5);

fn next_snapshot(feed: &Receiver<NotesSnapshot>) -> NotesSnapshot {
    feed.recv_timeout(FEED_TIMEOUT)
        .expect("feed should deliver a snapshot")
}

#[test]
fn subscriber_receives_initial_snapshot() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();

    let snapshot = next_snapshot(&feed);
    assert!(snapshot.is_empty());

    worker.shutdown();
}

#[test]
fn create_is_reflected_in_next_snapshot() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker
        .create(Some("from worker".to_string()), Some("body".to_string()))
        .unwrap();

    let snapshot = next_snapshot(&feed);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title.as_deref(), Some("from worker"));
    assert!(snapshot[0].id.is_some());

    worker.shutdown();
}

#[test]
fn update_and_delete_flow_through_the_feed() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker.create(Some("original".to_string()), None).unwrap();
    let created = next_snapshot(&feed);
    let id = created[0].id.unwrap();

    worker
        .update(id, Some("edited".to_string()), Some("more text".to_string()))
        .unwrap();
    let edited = next_snapshot(&feed);
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].id, Some(id));
    assert_eq!(edited[0].title.as_deref(), Some("edited"));

    worker.delete(id).unwrap();
    let emptied = next_snapshot(&feed);
    assert!(emptied.is_empty());

    worker.shutdown();
}

#[test]
fn failed_write_still_refreshes_the_feed() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    // Empty input is rejected and logged inside the worker; the feed still
    // re-renders from stored truth with nothing added.
    worker.create(None, Some("   ".to_string())).unwrap();

    let snapshot = next_snapshot(&feed);
    assert!(snapshot.is_empty());

    worker.shutdown();
}

#[test]
fn refresh_broadcasts_without_mutating() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker.create(Some("stable".to_string()), None).unwrap();
    let first = next_snapshot(&feed);

    worker.refresh().unwrap();
    let second = next_snapshot(&feed);

    assert_eq!(first, second);

    worker.shutdown();
}

#[test]
fn commands_apply_in_submission_order() {
    let worker = NoteWorker::spawn_in_memory().unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker.create(Some("a".to_string()), None).unwrap();
    worker.create(Some("b".to_string()), None).unwrap();
    worker.create(Some("c".to_string()), None).unwrap();

    let _after_a = next_snapshot(&feed);
    let _after_b = next_snapshot(&feed);
    let after_c = next_snapshot(&feed);

    let titles: Vec<_> = after_c
        .iter()
        .map(|note| note.title.clone().unwrap())
        .collect();
    // Newest-first list ordering.
    assert_eq!(titles, vec!["c", "b", "a"]);

    worker.shutdown();
}

#[test]
fn dropped_subscriber_does_not_stall_the_worker() {
    let worker = NoteWorker::spawn_in_memory().unwrap();

    let dropped = worker.subscribe().unwrap();
    drop(dropped);

    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker.create(Some("still alive".to_string()), None).unwrap();
    let snapshot = next_snapshot(&feed);
    assert_eq!(snapshot.len(), 1);

    worker.shutdown();
}

#[test]
fn worker_persists_to_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jotpad.db");

    let worker = NoteWorker::spawn(&path).unwrap();
    let feed = worker.subscribe().unwrap();
    let _initial = next_snapshot(&feed);

    worker.create(Some("durable".to_string()), None).unwrap();
    let _created = next_snapshot(&feed);
    worker.shutdown();

    // A fresh connection sees the committed row.
    let conn = jotpad_core::db::open_db(&path).unwrap();
    let repo = jotpad_core::SqliteNoteRepository::try_new(&conn).unwrap();
    use jotpad_core::NoteRepository;
    let notes = repo.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title.as_deref(), Some("durable"));
}
