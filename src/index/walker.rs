//! Directory walk producing indexing candidates.
//!
//! Built on the `ignore` crate's `WalkBuilder`, the same crate family
//! `llmx-mcp` uses for its own walk, but with VCS-ignore handling turned off
//! entirely: this engine's hidden-entry rule is its own (`.`/`$` prefix), not
//! `.gitignore` semantics, and leaving gitignore matching on would silently
//! skip files a caller expects indexed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

pub struct FileWalker {
    follow_symlinks: bool,
    hidden_files: bool,
}

impl FileWalker {
    pub fn new(follow_symlinks: bool, hidden_files: bool) -> Self {
        Self {
            follow_symlinks,
            hidden_files,
        }
    }

    /// Returns every regular file under `root`, pruning names starting with
    /// `.` or `$` unless `hidden_files` is set, and de-duplicating symlink
    /// targets to guard against cycles.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(root);
        builder
            .git_ignore(false)
            .git_exclude(false)
            .git_global(false)
            .ignore(false)
            .parents(false)
            .follow_links(self.follow_symlinks)
            .hidden(false); // we apply our own hidden-name rule below

        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for entry in builder.build().flatten() {
            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if !self.hidden_files && has_hidden_component(path, root) {
                continue;
            }
            let dedup_key = path
                .canonicalize()
                .unwrap_or_else(|_| path.to_path_buf());
            if !seen.insert(dedup_key) {
                continue;
            }
            out.push(path.to_path_buf());
        }
        out
    }
}

fn has_hidden_component(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|c| {
        let s = c.as_os_str().to_string_lossy();
        s.starts_with('.') || s.starts_with('$')
    })
}
