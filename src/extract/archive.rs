//! `.zip` extraction: a listing of every entry plus inlined content of small
//! inner text files, mirroring the original's `_extract_zip`.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{EngineError, Result};
use crate::extract::text::decode_text;

const INLINE_MAX_BYTES: u64 = 10_000;
const INLINE_EXTENSIONS: [&str; 5] = [".txt", ".md", ".json", ".xml", ".csv"];

pub fn extract(path: &Path, bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| EngineError::Extract {
        path: path.to_path_buf(),
        cause: e.to_string(),
    })?;

    let mut listing = Vec::new();
    let mut inline_sections = Vec::new();

    for i in 0..archive.len() {
        let (name, size, is_file) = {
            let entry = archive.by_index(i).map_err(|e| EngineError::Extract {
                path: path.to_path_buf(),
                cause: e.to_string(),
            })?;
            (entry.name().to_string(), entry.size(), entry.is_file())
        };
        if !is_file {
            continue;
        }
        listing.push(format!("  {name} ({size} bytes)"));

        let lower = name.to_lowercase();
        let inlinable = size <= INLINE_MAX_BYTES && INLINE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
        if inlinable {
            let mut entry = archive.by_index(i).map_err(|e| EngineError::Extract {
                path: path.to_path_buf(),
                cause: e.to_string(),
            })?;
            let mut buf = Vec::new();
            if entry.read_to_end(&mut buf).is_ok() {
                inline_sections.push(format!("--- {name} ---\n{}", decode_text(&buf)));
            }
        }
    }

    let mut out = listing.join("\n");
    if !inline_sections.is_empty() {
        out.push_str("\n\n");
        out.push_str(&inline_sections.join("\n\n"));
    }
    Ok(out)
}
