//! PDF text extraction via `pdf-extract`, page text concatenated with blank
//! lines. Grounded in the `extract_pdf_text` helper's use of
//! `pdf_extract::extract_text_from_mem`.

use std::path::Path;

use crate::error::{EngineError, Result};

pub fn extract(path: &Path, bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| EngineError::Extract {
        path: path.to_path_buf(),
        cause: e.to_string(),
    })
}
