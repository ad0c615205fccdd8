//! Engine configuration record.
//!
//! The crate never reads a config file or environment variable itself —
//! populating this record from disk is the caller's job. `EngineConfig`
//! only fixes the shape, defaults, and validation rules.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

fn default_extensions() -> Vec<String> {
    [
        ".txt", ".md", ".docx", ".doc", ".pdf", ".xlsx", ".xls", ".pptx", ".ppt", ".csv", ".json",
        ".xml", ".html", ".htm", ".py", ".js", ".ts", ".sql", ".log", ".ini", ".cfg", ".yaml",
        ".yml", ".zip",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_file_size_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    100
}

/// Ambient configuration record described in §6.1 of the design. Construct it
/// directly or via [`Default`], then call [`EngineConfig::validate`] before
/// handing it to [`crate::Engine::open`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub db_path: PathBuf,
    pub allowed_roots: Vec<PathBuf>,
    pub supported_extensions: Vec<String>,
    pub max_file_size_bytes: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub hidden_files: bool,
    pub follow_symlinks: bool,
    pub enable_reranker: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/file_index.sqlite3"),
            allowed_roots: Vec::new(),
            supported_extensions: default_extensions(),
            max_file_size_bytes: default_max_file_size_bytes(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            hidden_files: false,
            follow_symlinks: false,
            enable_reranker: false,
        }
    }
}

impl EngineConfig {
    /// Checks field-level invariants. Non-positive sizes and an overlap
    /// that would never let a chunk window advance are rejected up front
    /// rather than surfacing as a confusing infinite loop later.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(EngineError::Config {
                field: "chunk_size".into(),
                cause: "must be positive".into(),
            });
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(EngineError::Config {
                field: "chunk_overlap".into(),
                cause: format!(
                    "must be smaller than chunk_size ({} >= {})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }
        if self.max_file_size_bytes == 0 {
            return Err(EngineError::Config {
                field: "max_file_size_bytes".into(),
                cause: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Empty allow-list means "allow any root", matching the original's
    /// `is_network_path_allowed` behavior.
    pub fn is_root_allowed(&self, root: &std::path::Path) -> bool {
        if self.allowed_roots.is_empty() {
            return true;
        }
        self.allowed_roots.iter().any(|allowed| root.starts_with(allowed))
    }
}
