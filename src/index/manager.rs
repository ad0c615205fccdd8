//! Crawl/index driver: walk a root, decide what changed, extract + chunk +
//! persist, then reconcile deletions. Grounded in `indexing/manager.rs`'s
//! phased `run_indexing` (scan, diff against existing, batch-process,
//! report counters) and in the original `FileIndexer.index_folder`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::chunk::chunk_text;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::extract::{ExtractorRegistry, Outcome};
use crate::index::change_detector::needs_index;
use crate::index::walker::FileWalker;
use crate::store::SqliteStore;
use crate::types::{ChunkRecord, FileRecord, FileState, IndexMode, IndexStats, Priority};

const LOW_PRIORITY_YIELD: Duration = Duration::from_millis(10);

pub struct IndexManager {
    config: EngineConfig,
    store: SqliteStore,
    extractors: ExtractorRegistry,
}

impl IndexManager {
    pub fn new(config: EngineConfig, store: SqliteStore) -> Self {
        Self {
            config,
            store,
            extractors: ExtractorRegistry::new(),
        }
    }

    /// Runs a single crawl of `root`: walk, detect changes, extract, chunk,
    /// and persist each file, yielding cooperatively and honoring cancellation.
    pub async fn index_root(
        &self,
        root: &Path,
        mode: IndexMode,
        priority: Priority,
        cancel: &CancellationToken,
    ) -> Result<IndexStats> {
        let started = Instant::now();

        if !self.config.is_root_allowed(root) {
            return Err(EngineError::NotAuthorized { root: root.to_path_buf() });
        }
        if !root.exists() {
            return Err(EngineError::RootMissing { root: root.to_path_buf() });
        }
        let root = root
            .canonicalize()
            .map_err(|e| EngineError::FsTransient { path: root.to_path_buf(), cause: e.to_string() })?;

        let existing = self.store.existing_under_root(root.clone()).await?;

        let walker = FileWalker::new(self.config.follow_symlinks, self.config.hidden_files);
        let candidates = walker.walk(&root);

        let mut stats = IndexStats::default();
        let mut observed = std::collections::HashSet::new();

        for path in candidates {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                stats.duration_ms = started.elapsed().as_millis() as u64;
                return Ok(stats);
            }

            let extension = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!(".{}", ext.to_lowercase()),
                None => {
                    stats.skipped += 1;
                    continue;
                }
            };
            if !self.config.supported_extensions.iter().any(|e| e == &extension) {
                stats.skipped += 1;
                continue;
            }

            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "stat failed");
                    stats.errors += 1;
                    continue;
                }
            };
            let size = metadata.len();
            if size > self.config.max_file_size_bytes {
                stats.skipped += 1;
                continue;
            }
            let mtime = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);

            observed.insert(path.clone());

            let full_reindex = matches!(mode, IndexMode::Full);
            if !needs_index(&path, size, mtime, &existing, full_reindex) {
                stats.skipped += 1;
                continue;
            }

            match self.index_one_file(&path, &extension, size, mtime, &root).await {
                Ok(true) => stats.indexed += 1,
                Ok(false) => stats.skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(), error = %e, state = ?FileState::Failed,
                        "indexing failed for file"
                    );
                    stats.errors += 1;
                }
            }

            if matches!(priority, Priority::Low) {
                sleep(LOW_PRIORITY_YIELD).await;
            }
        }

        for existing_path in existing.keys() {
            if !observed.contains(existing_path) {
                if self.store.delete_file(existing_path.clone()).await? {
                    stats.removed += 1;
                    tracing::debug!(path = %existing_path.display(), state = ?FileState::Deleted, "file state transition");
                }
            }
        }

        stats.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(root = %root.display(), ?stats, "crawl complete");
        Ok(stats)
    }

    async fn index_one_file(
        &self,
        path: &Path,
        extension: &str,
        size: u64,
        mtime: f64,
        root_tag: &Path,
    ) -> Result<bool> {
        tracing::debug!(path = %path.display(), state = ?FileState::Scheduled, "file state transition");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EngineError::FsTransient { path: path.to_path_buf(), cause: e.to_string() })?;

        tracing::debug!(
            path = %path.display(), binary = self.extractors.is_binary_format(extension),
            state = ?FileState::Extracting, "file state transition"
        );
        let outcome = self.extractors.extract(path, extension, &bytes)?;
        let text = match outcome {
            Outcome::Extracted(text) => text,
            Outcome::Skipped => {
                tracing::debug!(path = %path.display(), state = ?FileState::Skipped, "file state transition");
                return Ok(false);
            }
        };

        tracing::debug!(path = %path.display(), state = ?FileState::Chunking, "file state transition");
        let chunks = chunk_text(&text, self.config.chunk_size, self.config.chunk_overlap);
        if chunks.is_empty() {
            tracing::debug!(path = %path.display(), state = ?FileState::Skipped, "file state transition");
            return Ok(false);
        }

        let file = FileRecord::pending(
            path.to_path_buf(),
            size,
            mtime,
            extension.to_string(),
            Some(root_tag.to_path_buf()),
        );
        let chunk_records = chunks
            .into_iter()
            .enumerate()
            .map(|(i, content)| ChunkRecord::pending(format!("chunk_{i}"), content))
            .collect();

        self.store.upsert_file_with_chunks(file, chunk_records).await?;
        tracing::debug!(path = %path.display(), state = ?FileState::Persisted, "file state transition");
        Ok(true)
    }
}
