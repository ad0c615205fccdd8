//! CRUD and search operations over the schema in [`super::schema`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::params;
use sha2::{Digest, Sha256};

use crate::error::{EngineError, Result};
use crate::store::sqlite::{OptionalExt, SqliteStore};
use crate::types::{ChunkRecord, FileRecord, SearchFilters, SearchItem};

const SNIPPET_PREFIX: &str = "<mark>";
const SNIPPET_SUFFIX: &str = "</mark>";
const SNIPPET_ELLIPSIS: &str = "...";
const SNIPPET_TOKEN_WINDOW: i64 = 64;

/// Content fingerprint over (path, size, mtime). Used only for
/// deduplication diagnostics, never as a primary key.
fn compute_fingerprint(path: &Path, size: u64, mtime: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(size.to_le_bytes());
    hasher.update(mtime.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

impl SqliteStore {
    /// Inserts or replaces a file row and, in the same transaction, replaces
    /// all of its chunks. Atomic per §4.1: a crash mid-write never leaves a
    /// file with chunks from two different versions of its content.
    ///
    /// `file.id` and `file.fingerprint` are ignored on input — the real id
    /// and a freshly computed fingerprint come back in the returned record.
    pub async fn upsert_file_with_chunks(
        &self,
        file: FileRecord,
        chunks: Vec<ChunkRecord>,
    ) -> Result<FileRecord> {
        self.transaction(move |tx| {
            let path = file.path.clone();
            let root_tag_str = file.root_tag.as_ref().map(|p| p.to_string_lossy().into_owned());
            let fingerprint = compute_fingerprint(&path, file.size, file.mtime);

            tx.execute(
                "INSERT INTO files (path, size, mtime, ext, root_tag, accessible, fingerprint)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
                 ON CONFLICT(path) DO UPDATE SET
                     size = excluded.size,
                     mtime = excluded.mtime,
                     ext = excluded.ext,
                     root_tag = excluded.root_tag,
                     accessible = 1,
                     fingerprint = excluded.fingerprint",
                params![path.to_string_lossy(), file.size, file.mtime, file.extension, root_tag_str, fingerprint],
            )
            .map_err(|e| EngineError::StoreWrite {
                path: path.clone(),
                cause: e.to_string(),
            })?;

            let file_id: i64 = tx
                .query_row(
                    "SELECT id FROM files WHERE path = ?1",
                    params![path.to_string_lossy()],
                    |row| row.get(0),
                )
                .map_err(|e| EngineError::StoreWrite {
                    path: path.clone(),
                    cause: e.to_string(),
                })?;

            tx.execute(
                "DELETE FROM docs WHERE file_id = ?1",
                params![file_id],
            )
            .map_err(|e| EngineError::StoreWrite {
                path: path.clone(),
                cause: e.to_string(),
            })?;

            let mut stmt = tx
                .prepare("INSERT INTO docs (file_id, pointer, content) VALUES (?1, ?2, ?3)")
                .map_err(|e| EngineError::StoreWrite {
                    path: path.clone(),
                    cause: e.to_string(),
                })?;
            for chunk in chunks {
                stmt.execute(params![file_id, chunk.pointer, chunk.content])
                    .map_err(|e| EngineError::StoreWrite {
                        path: path.clone(),
                        cause: e.to_string(),
                    })?;
            }
            drop(stmt);

            Ok(FileRecord { id: file_id, fingerprint, ..file })
        })
        .await
    }

    pub async fn delete_file(&self, path: PathBuf) -> Result<bool> {
        self.transaction(move |tx| {
            let file_id: Option<i64> = tx
                .query_row(
                    "SELECT id FROM files WHERE path = ?1",
                    params![path.to_string_lossy()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| EngineError::StoreWrite {
                    path: path.clone(),
                    cause: e.to_string(),
                })?;
            let Some(file_id) = file_id else {
                return Ok(false);
            };
            tx.execute("DELETE FROM docs WHERE file_id = ?1", params![file_id])
                .map_err(|e| EngineError::StoreWrite {
                    path: path.clone(),
                    cause: e.to_string(),
                })?;
            tx.execute("DELETE FROM files WHERE id = ?1", params![file_id])
                .map_err(|e| EngineError::StoreWrite {
                    path: path.clone(),
                    cause: e.to_string(),
                })?;
            Ok(true)
        })
        .await
    }

    /// Snapshot of every file previously indexed under `root`, used by the
    /// crawler's change detector.
    pub async fn existing_under_root(&self, root: PathBuf) -> Result<HashMap<PathBuf, FileRecord>> {
        self.query(move |conn| {
            let prefix = format!("{}%", root.to_string_lossy());
            let mut stmt = conn
                .prepare(
                    "SELECT id, path, size, mtime, ext, root_tag, accessible, fingerprint \
                     FROM files WHERE path LIKE ?1",
                )
                .map_err(|e| EngineError::Sqlite {
                    path: root.clone(),
                    cause: e.to_string(),
                })?;
            let rows = stmt
                .query_map(params![prefix], |row| {
                    let path: String = row.get(1)?;
                    let root_tag: Option<String> = row.get(5)?;
                    let accessible: i64 = row.get(6)?;
                    Ok(FileRecord {
                        id: row.get(0)?,
                        path: PathBuf::from(path),
                        size: row.get(2)?,
                        mtime: row.get(3)?,
                        extension: row.get(4)?,
                        root_tag: root_tag.map(PathBuf::from),
                        accessible: accessible != 0,
                        fingerprint: row.get(7)?,
                    })
                })
                .map_err(|e| EngineError::Sqlite {
                    path: root.clone(),
                    cause: e.to_string(),
                })?;
            let mut map = HashMap::new();
            for row in rows {
                let record =
                    row.map_err(|e| EngineError::Sqlite { path: root.clone(), cause: e.to_string() })?;
                map.insert(record.path.clone(), record);
            }
            Ok(map)
        })
        .await
    }

    /// Runs a full-text search. `fts_expr = None` means match-all: the
    /// `MATCH` clause is omitted entirely rather than passed a literal `*`,
    /// since FTS5 has no universal wildcard token.
    pub async fn search(
        &self,
        fts_expr: Option<String>,
        filters: SearchFilters,
        limit: usize,
    ) -> Result<Vec<SearchItem>> {
        self.query(move |conn| {
            let mut where_clauses = Vec::new();
            let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(expr) = &fts_expr {
                where_clauses.push("docs MATCH ?".to_string());
                params_vec.push(Box::new(expr.clone()));
            }

            if !filters.extensions.is_empty() {
                let placeholders = filters.extensions.iter().map(|_| "?").collect::<Vec<_>>().join(",");
                where_clauses.push(format!("f.ext IN ({placeholders})"));
                for ext in &filters.extensions {
                    params_vec.push(Box::new(ext.clone()));
                }
            }

            if !filters.years.is_empty() {
                let mut year_conditions = Vec::new();
                for year in &filters.years {
                    let start = year_start_epoch(*year)?;
                    let end = year_end_epoch(*year)?;
                    year_conditions.push("(f.mtime >= ? AND f.mtime <= ?)".to_string());
                    params_vec.push(Box::new(start));
                    params_vec.push(Box::new(end));
                }
                where_clauses.push(format!("({})", year_conditions.join(" OR ")));
            }

            if !filters.roots.is_empty() {
                let mut root_conditions = Vec::new();
                for root in &filters.roots {
                    root_conditions.push("f.path LIKE ?".to_string());
                    params_vec.push(Box::new(format!("{}%", root.to_string_lossy())));
                }
                where_clauses.push(format!("({})", root_conditions.join(" OR ")));
            }

            if let Some(after) = filters.modified_after {
                let epoch = after
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc()
                    .timestamp() as f64;
                where_clauses.push("f.mtime >= ?".to_string());
                params_vec.push(Box::new(epoch));
            }

            let sql = format!(
                "SELECT f.path, d.pointer, snippet(docs, 2, '{prefix}', '{suffix}', '{ellipsis}', {window}) AS snip, \
                 rank AS score, f.ext, f.mtime \
                 FROM docs d JOIN files f ON d.file_id = f.id \
                 {where_sql} \
                 ORDER BY rank LIMIT ?",
                prefix = SNIPPET_PREFIX,
                suffix = SNIPPET_SUFFIX,
                ellipsis = SNIPPET_ELLIPSIS,
                window = SNIPPET_TOKEN_WINDOW,
                where_sql = if where_clauses.is_empty() {
                    String::new()
                } else {
                    format!("WHERE {}", where_clauses.join(" AND "))
                },
            );
            params_vec.push(Box::new(limit as i64));

            let mut stmt = conn.prepare(&sql).map_err(|e| EngineError::Sqlite {
                path: PathBuf::new(),
                cause: e.to_string(),
            })?;
            let param_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|b| b.as_ref()).collect();
            let rows = stmt
                .query_map(param_refs.as_slice(), |row| {
                    Ok(SearchItem {
                        path: PathBuf::from(row.get::<_, String>(0)?),
                        pointer: row.get(1)?,
                        snippet: row.get(2)?,
                        score: row.get(3)?,
                        extension: row.get(4)?,
                        mtime: row.get(5)?,
                    })
                })
                .map_err(|e| EngineError::Sqlite {
                    path: PathBuf::new(),
                    cause: e.to_string(),
                })?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row.map_err(|e| EngineError::Sqlite {
                    path: PathBuf::new(),
                    cause: e.to_string(),
                })?);
            }
            Ok(items)
        })
        .await
    }

    /// Looks up one chunk's content plus its file's size. Falls back to the
    /// first chunk (by rowid) when `pointer` is omitted.
    pub async fn load_chunk(&self, path: PathBuf, pointer: Option<String>) -> Result<(String, String, u64)> {
        self.query(move |conn| {
            let row = if let Some(pointer) = &pointer {
                conn.query_row(
                    "SELECT d.content, d.pointer, f.size FROM docs d JOIN files f ON d.file_id = f.id \
                     WHERE f.path = ?1 AND d.pointer = ?2",
                    params![path.to_string_lossy(), pointer],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, u64>(2)?)),
                )
            } else {
                conn.query_row(
                    "SELECT d.content, d.pointer, f.size FROM docs d JOIN files f ON d.file_id = f.id \
                     WHERE f.path = ?1 ORDER BY d.rowid LIMIT 1",
                    params![path.to_string_lossy()],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, u64>(2)?)),
                )
            };
            row.optional_with_path(&path)?.ok_or_else(|| EngineError::NotIndexed { path: path.clone() })
        })
        .await
    }
}

fn year_start_epoch(year: i32) -> Result<f64> {
    use chrono::TimeZone;
    chrono::Local
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp() as f64)
        .ok_or_else(|| EngineError::BadFilter {
            reason: format!("invalid year {year}"),
        })
}

fn year_end_epoch(year: i32) -> Result<f64> {
    use chrono::TimeZone;
    chrono::Local
        .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .map(|dt| dt.timestamp() as f64)
        .ok_or_else(|| EngineError::BadFilter {
            reason: format!("invalid year {year}"),
        })
}

trait OptionalRow<T> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
