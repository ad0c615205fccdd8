//! Named, fixed-field records exchanged across component boundaries.
//!
//! The original dynamically-typed dictionaries are replaced with structs
//! throughout — every Store row and every search result has exactly one
//! named shape.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: i64,
    pub path: PathBuf,
    pub size: u64,
    pub mtime: f64,
    pub extension: String,
    pub root_tag: Option<PathBuf>,
    pub accessible: bool,
    /// Content fingerprint over (path, size, mtime), used only for
    /// deduplication diagnostics. Filled in by the store on upsert.
    pub fingerprint: String,
}

impl FileRecord {
    /// Builds a record for a file not yet persisted. `id` and `fingerprint`
    /// are placeholders the store overwrites on upsert.
    pub fn pending(
        path: PathBuf,
        size: u64,
        mtime: f64,
        extension: String,
        root_tag: Option<PathBuf>,
    ) -> Self {
        Self {
            id: 0,
            path,
            size,
            mtime,
            extension,
            root_tag,
            accessible: true,
            fingerprint: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub file_id: i64,
    pub pointer: String,
    pub content: String,
}

impl ChunkRecord {
    /// Builds a chunk not yet attached to a file id; the store fills in
    /// `file_id` when persisting alongside its parent [`FileRecord`].
    pub fn pending(pointer: String, content: String) -> Self {
        Self { file_id: 0, pointer, content }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchItem {
    pub path: PathBuf,
    pub pointer: String,
    pub snippet: String,
    pub score: f64,
    pub extension: String,
    pub mtime: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub returned: usize,
    pub total_estimate: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub path: PathBuf,
    pub pointer: String,
    pub preview: String,
    pub truncated: bool,
    pub file_size: u64,
}

/// Counters returned from a single `index_root` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub indexed: u64,
    pub skipped: u64,
    pub removed: u64,
    pub errors: u64,
    pub duration_ms: u64,
    pub cancelled: bool,
}

/// Whether a crawl revisits everything or only files whose (size, mtime)
/// snapshot changed since the last crawl of that root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    Incremental,
    Full,
}

/// Cooperative-yield hint used by the crawler between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// Per-file state machine. `Persisted`, `Skipped`, and `Failed` are terminal
/// for a given crawl pass; any state can move to `Deleted` during
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Unknown,
    Scheduled,
    Extracting,
    Chunking,
    Persisted,
    Skipped,
    Failed,
    Deleted,
}

/// Structural filters accepted by [`crate::search::SearchEngine::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub extensions: Vec<String>,
    pub years: Vec<i32>,
    pub roots: Vec<PathBuf>,
    pub modified_after: Option<chrono::NaiveDate>,
}
