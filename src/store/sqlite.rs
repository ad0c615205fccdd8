//! Connection handle wrapping a single SQLite database file.
//!
//! Every operation runs on the blocking pool (`spawn_blocking`) so the async
//! query and indexing paths never block the runtime on a synchronous SQLite
//! call, matching `codex_retrieval::storage::sqlite::SqliteStore`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::task::spawn_blocking;

use crate::error::{EngineError, Result};
use crate::store::schema::{CURRENT_SCHEMA_VERSION, SCHEMA};

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::Sqlite {
                    path: path.to_path_buf(),
                    cause: format!("failed to create parent directory: {e}"),
                })?;
            }
        }
        let conn = Connection::open(path).map_err(|e| EngineError::Sqlite {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Self::init_schema(&conn, path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_schema(conn: &Connection, path: &Path) -> Result<()> {
        conn.execute_batch(SCHEMA).map_err(|e| EngineError::Sqlite {
            path: path.to_path_buf(),
            cause: format!("schema init failed: {e}"),
        })?;
        let version: i64 = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .optional_with_path(path)?
            .unwrap_or(0);
        if version == 0 {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [CURRENT_SCHEMA_VERSION],
            )
            .map_err(|e| EngineError::Sqlite {
                path: path.to_path_buf(),
                cause: format!("schema version bootstrap failed: {e}"),
            })?;
        }
        Ok(())
    }

    /// Run a closure against the connection on the blocking pool.
    pub async fn query<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let path = self.path.clone();
        spawn_blocking(move || {
            let guard = match conn.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    tracing::warn!(path = %path.display(), "store mutex poisoned, recovering");
                    let guard = poisoned.into_inner();
                    if !guard.is_autocommit() {
                        let _ = guard.execute_batch("ROLLBACK");
                    }
                    guard
                }
            };
            f(&guard)
        })
        .await
        .map_err(|e| EngineError::TaskJoin { cause: e.to_string() })?
    }

    /// Run a closure inside a transaction, committing on success.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let path = self.path.clone();
        spawn_blocking(move || {
            let mut guard = match conn.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    tracing::warn!(path = %path.display(), "store mutex poisoned, recovering");
                    let guard = poisoned.into_inner();
                    if !guard.is_autocommit() {
                        let _ = guard.execute_batch("ROLLBACK");
                    }
                    guard
                }
            };
            let tx = guard.transaction().map_err(|e| EngineError::Sqlite {
                path: path.clone(),
                cause: e.to_string(),
            })?;
            let result = f(&tx)?;
            tx.commit().map_err(|e| EngineError::Sqlite {
                path: path.clone(),
                cause: format!("commit failed: {e}"),
            })?;
            Ok(result)
        })
        .await
        .map_err(|e| EngineError::TaskJoin { cause: e.to_string() })?
    }
}

/// Adapts `rusqlite::Error::QueryReturnedNoRows` into `Option::None`.
pub trait OptionalExt<T> {
    fn optional_with_path(self, path: &Path) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional_with_path(self, path: &Path) -> Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(EngineError::Sqlite {
                path: path.to_path_buf(),
                cause: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_bootstraps_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("index.sqlite3");
        let store = SqliteStore::open(&db_path).unwrap();
        let version: i64 = store
            .query(|conn| {
                conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
                    .map_err(|e| EngineError::Sqlite {
                        path: PathBuf::new(),
                        cause: e.to_string(),
                    })
            })
            .await
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("index.sqlite3");
        SqliteStore::open(&db_path).unwrap();
        SqliteStore::open(&db_path).unwrap();
    }
}
