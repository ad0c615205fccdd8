//! Search engine (§4.6): parse, retrieve, optionally rerank, paginate, and
//! assemble previews.

pub mod reranker;

use std::path::PathBuf;

use crate::error::{EngineError, Result};
use crate::query;
use crate::store::SqliteStore;
use crate::types::{Pagination, PreviewResult, SearchFilters, SearchResponse};

pub use reranker::{NoopReranker, Reranker};

/// Extra candidates fetched beyond `offset + k` so a configured reranker has
/// room to reorder without growing the result set.
const SEARCH_FETCH_MARGIN: usize = 16;

pub struct SearchEngine {
    store: SqliteStore,
    reranker: Box<dyn Reranker>,
}

impl SearchEngine {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            reranker: Box::new(NoopReranker),
        }
    }

    pub fn with_reranker(store: SqliteStore, reranker: Box<dyn Reranker>) -> Self {
        Self { store, reranker }
    }

    pub async fn search(
        &self,
        raw_query: &str,
        k: usize,
        offset: usize,
        filters: SearchFilters,
    ) -> Result<SearchResponse> {
        if k == 0 {
            return Err(EngineError::BadFilter { reason: "k must be at least 1".into() });
        }

        let fts_expr = query::parse(raw_query);
        let fetch_limit = offset + k + SEARCH_FETCH_MARGIN;
        let mut items = self.store.search(fts_expr, filters, fetch_limit).await?;

        self.reranker.rerank(raw_query, &mut items);

        let total_estimate = items.len();
        let page: Vec<_> = items.into_iter().skip(offset).take(k).collect();
        let pagination = Pagination {
            offset,
            returned: page.len(),
            total_estimate,
        };

        tracing::debug!(query = raw_query, returned = pagination.returned, "search complete");
        Ok(SearchResponse { items: page, pagination })
    }

    /// Centers a `before + after` character window at the chunk's midpoint,
    /// matching `get_file_preview` exactly — the window is centered on the
    /// content, not on any particular match position.
    pub async fn preview(
        &self,
        path: PathBuf,
        pointer: Option<String>,
        before: usize,
        after: usize,
    ) -> Result<PreviewResult> {
        let (content, resolved_pointer, file_size) = self.store.load_chunk(path.clone(), pointer).await?;

        let chars: Vec<char> = content.chars().collect();
        let (preview, truncated) = if chars.len() > before + after {
            let start = (chars.len() / 2).saturating_sub(before / 2);
            let end = (start + before + after).min(chars.len());
            (chars[start..end].iter().collect::<String>(), true)
        } else {
            (content, false)
        };

        Ok(PreviewResult {
            path,
            pointer: resolved_pointer,
            preview,
            truncated,
            file_size,
        })
    }
}
