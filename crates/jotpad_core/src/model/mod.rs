//! Domain model for the note entity.
//!
//! # Responsibility
//! - Define the single persisted record shape used by all layers.
//!
//! # Invariants
//! - `id` is assigned by the store on first save and never reused.
//! - A note must carry at least one non-blank field (title or body).

pub mod note;
