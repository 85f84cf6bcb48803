//! Note search entry points.
//!
//! # Responsibility
//! - Expose the in-memory list filter used by type-as-you-search UIs.
//! - Keep match semantics in one place so every caller agrees on them.

pub mod filter;
