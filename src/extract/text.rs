//! Multi-encoding plain-text decode and tag stripping for markup formats.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\n[ \t]*\n+").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Decodes raw bytes trying UTF-8, UTF-8 with BOM stripped, then
/// Windows-1252 as a byte-preserving fallback (Windows-1252 decodes every
/// byte sequence, so it is always the terminal case — unlike the original's
/// separate Latin-1/cp1252 attempts, `encoding_rs`'s WINDOWS_1252 codec
/// already subsumes Latin-1 for the bytes this crate ever sees).
pub fn decode_text(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    let stripped = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    if let Ok(s) = std::str::from_utf8(stripped) {
        return s.to_string();
    }
    let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    cow.into_owned()
}

/// Strips HTML/XML tags and collapses blank-line runs, for `.html`/`.htm`/`.xml`.
pub fn strip_markup(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, "\n\n");
    let lines = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    SPACE_RUN_RE.replace_all(lines.trim(), " ").into_owned()
}
