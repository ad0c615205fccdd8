//! Error taxonomy for the engine.
//!
//! Variants carry the offending path/field plus a `cause` string rather than
//! wrapping foreign error types directly, so `EngineError` stays
//! `Send + Sync + 'static` without leaking `rusqlite::Error` etc. into the
//! public API.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("root {root} is not under an allowed path")]
    NotAuthorized { root: PathBuf },

    #[error("root {root} does not exist")]
    RootMissing { root: PathBuf },

    #[error("invalid filter: {reason}")]
    BadFilter { reason: String },

    #[error("no index entry for {path}")]
    NotIndexed { path: PathBuf },

    #[error("extraction failed for {path}: {cause}")]
    Extract { path: PathBuf, cause: String },

    #[error("decode failed for {path}: {cause}")]
    Decode { path: PathBuf, cause: String },

    #[error("store write failed for {path}: {cause}")]
    StoreWrite { path: PathBuf, cause: String },

    #[error("transient filesystem error for {path}: {cause}")]
    FsTransient { path: PathBuf, cause: String },

    #[error("store corrupt at {db_path}: {cause}")]
    StoreCorrupt { db_path: PathBuf, cause: String },

    #[error("out of space writing {db_path}")]
    OutOfSpace { db_path: PathBuf },

    #[error("sqlite error on {path}: {cause}")]
    Sqlite { path: PathBuf, cause: String },

    #[error("invalid configuration field {field}: {cause}")]
    Config { field: String, cause: String },

    #[error("background task join failed: {cause}")]
    TaskJoin { cause: String },
}

impl EngineError {
    /// True for kinds the indexer should count and continue past rather than abort on.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            EngineError::Extract { .. }
                | EngineError::Decode { .. }
                | EngineError::StoreWrite { .. }
                | EngineError::FsTransient { .. }
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::StoreCorrupt { .. } | EngineError::OutOfSpace { .. }
        )
    }
}
