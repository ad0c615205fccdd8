//! Incremental-mode change decision: compare a freshly-stat'd (size, mtime)
//! pair against the snapshot [`crate::store::SqliteStore::existing_under_root`]
//! returned, per §4.4 rule 3.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::FileRecord;

/// Whether `candidate` needs (re-)indexing given `existing`, the prior
/// snapshot for its root, and whether this is a full reindex.
pub fn needs_index(
    path: &PathBuf,
    size: u64,
    mtime: f64,
    existing: &HashMap<PathBuf, FileRecord>,
    full_reindex: bool,
) -> bool {
    if full_reindex {
        return true;
    }
    match existing.get(path) {
        None => true,
        Some(record) => record.size != size || record.mtime != mtime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(path: &str, size: u64, mtime: f64) -> FileRecord {
        FileRecord::pending(PathBuf::from(path), size, mtime, ".txt".into(), None)
    }

    #[test]
    fn new_file_needs_indexing() {
        let existing = HashMap::new();
        assert!(needs_index(&PathBuf::from("/a"), 10, 1.0, &existing, false));
    }

    #[test]
    fn unchanged_file_is_skipped_in_incremental_mode() {
        let mut existing = HashMap::new();
        existing.insert(PathBuf::from("/a"), record_at("/a", 10, 1.0));
        assert!(!needs_index(&PathBuf::from("/a"), 10, 1.0, &existing, false));
    }

    #[test]
    fn changed_size_needs_indexing() {
        let mut existing = HashMap::new();
        existing.insert(PathBuf::from("/a"), record_at("/a", 10, 1.0));
        assert!(needs_index(&PathBuf::from("/a"), 11, 1.0, &existing, false));
    }

    #[test]
    fn changed_mtime_needs_indexing() {
        let mut existing = HashMap::new();
        existing.insert(PathBuf::from("/a"), record_at("/a", 10, 1.0));
        assert!(needs_index(&PathBuf::from("/a"), 10, 2.0, &existing, false));
    }

    #[test]
    fn full_reindex_always_true() {
        let mut existing = HashMap::new();
        existing.insert(PathBuf::from("/a"), record_at("/a", 10, 1.0));
        assert!(needs_index(&PathBuf::from("/a"), 10, 1.0, &existing, true));
    }
}
