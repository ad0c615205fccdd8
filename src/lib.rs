//! A local-first file search engine: incremental crawling and multi-format
//! text extraction feeding a persistent SQLite FTS5 index, queried through a
//! small AND/phrase/prefix-wildcard parser with optional result reranking.
//!
//! [`Engine`] is the crate's single public entry point, combining a
//! [`store::SqliteStore`], an [`index::IndexManager`], and a
//! [`search::SearchEngine`] over one [`config::EngineConfig`] behind a
//! single facade.

pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod query;
pub mod search;
pub mod store;
pub mod types;

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use types::{
    ChunkRecord, FileRecord, FileState, IndexMode, IndexStats, Pagination, PreviewResult, Priority,
    SearchFilters, SearchItem, SearchResponse,
};

use index::IndexManager;
use search::{Reranker, SearchEngine};
use store::SqliteStore;

/// Top-level handle over one database. Construct with [`Engine::open`],
/// optionally attach a [`Reranker`] with [`Engine::with_reranker`], then call
/// [`Engine::index_root`], [`Engine::search`], [`Engine::preview`], or
/// [`Engine::forget`].
pub struct Engine {
    config: EngineConfig,
    store: SqliteStore,
    indexer: IndexManager,
    searcher: SearchEngine,
}

impl Engine {
    pub fn open(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let store = SqliteStore::open(&config.db_path)?;
        let indexer = IndexManager::new(config.clone(), store.clone());
        let searcher = SearchEngine::new(store.clone());
        Ok(Self { config, store, indexer, searcher })
    }

    pub fn with_reranker(mut self, reranker: Box<dyn Reranker>) -> Self {
        self.searcher = SearchEngine::with_reranker(self.store.clone(), reranker);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn index_root(
        &self,
        root: &Path,
        mode: IndexMode,
        priority: Priority,
        cancel: &CancellationToken,
    ) -> Result<IndexStats> {
        self.indexer.index_root(root, mode, priority, cancel).await
    }

    pub async fn search(
        &self,
        query: &str,
        k: usize,
        offset: usize,
        filters: SearchFilters,
    ) -> Result<SearchResponse> {
        self.searcher.search(query, k, offset, filters).await
    }

    pub async fn preview(
        &self,
        path: PathBuf,
        pointer: Option<String>,
        before: usize,
        after: usize,
    ) -> Result<PreviewResult> {
        self.searcher.preview(path, pointer, before, after).await
    }

    pub async fn forget(&self, path: PathBuf) -> Result<bool> {
        self.store.delete_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn end_to_end_index_and_search() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        fs::write(dir.path().join("b.md"), "# Title\n\nhello").unwrap();
        fs::write(dir.path().join("c.bin"), "hello").unwrap();

        let mut cfg = EngineConfig::default();
        cfg.db_path = dir.path().join("idx.sqlite3");
        let engine = Engine::open(cfg).unwrap();

        let stats = engine
            .index_root(dir.path(), IndexMode::Full, Priority::Normal, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(stats.indexed, 2);
        assert_eq!(stats.skipped, 1);

        let resp = engine.search("hello", 10, 0, SearchFilters::default()).await.unwrap();
        assert_eq!(resp.items.len(), 2);
    }

    #[tokio::test]
    async fn forget_removes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        let mut cfg = EngineConfig::default();
        cfg.db_path = dir.path().join("idx.sqlite3");
        let engine = Engine::open(cfg).unwrap();
        engine
            .index_root(dir.path(), IndexMode::Full, Priority::Normal, &CancellationToken::new())
            .await
            .unwrap();

        let removed = engine.forget(dir.path().join("a.txt")).await.unwrap();
        assert!(removed);
        let resp = engine.search("hello", 10, 0, SearchFilters::default()).await.unwrap();
        assert!(resp.items.is_empty());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_at_open() {
        let mut cfg = EngineConfig::default();
        cfg.chunk_size = 0;
        assert!(Engine::open(cfg).is_err());
    }
}
