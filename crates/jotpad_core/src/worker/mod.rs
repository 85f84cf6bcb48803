//! Background persistence worker.
//!
//! # Responsibility
//! - Offload every write/delete from the calling (UI) thread to a single
//!   background queue.
//! - Push refreshed note-list snapshots to subscribers after each change.
//!
//! # Invariants
//! - Exactly one thread owns the worker's SQLite connection.
//! - Commands are applied in submission order; there is no coordination
//!   between producers and no backpressure.

pub mod note_worker;
