//! Persistent storage: a single embedded SQLite database holding file
//! metadata and a content-backed FTS5 inverted index over chunk text.
//!
//! Deliberately SQLite-only — no split relational/vector backend. One
//! embedded store with FTS5 is enough for this crate's scale, and it keeps
//! the write path single-writer and easy to reason about.

mod queries;
mod schema;
mod sqlite;

pub use sqlite::SqliteStore;
