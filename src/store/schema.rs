//! Schema DDL, bootstrapped once per database file.
//!
//! Chunk content lives directly in the FTS5 table rather than in external-
//! content mode: chunk text is always replaced wholesale (never updated in
//! place), so there is no mutation hazard an external-content split would
//! need to guard against, and `snippet()`/`bm25()` can operate on the FTS5
//! table directly.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY,
    path TEXT UNIQUE NOT NULL,
    size INTEGER NOT NULL,
    mtime REAL NOT NULL,
    ext TEXT NOT NULL,
    root_tag TEXT,
    accessible INTEGER NOT NULL DEFAULT 1,
    fingerprint TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_files_path ON files(path);
CREATE INDEX IF NOT EXISTS idx_files_mtime ON files(mtime);
CREATE INDEX IF NOT EXISTS idx_files_root_tag ON files(root_tag);

-- Chunk content lives directly in this content-backed FTS5 table; `file_id`
-- and `pointer` are UNINDEXED so they are stored but not tokenized, letting
-- queries join back to `files` and look up a specific chunk by pointer.
CREATE VIRTUAL TABLE IF NOT EXISTS docs USING fts5(
    file_id UNINDEXED,
    pointer UNINDEXED,
    content
);
"#;

pub const CURRENT_SCHEMA_VERSION: i64 = 1;
