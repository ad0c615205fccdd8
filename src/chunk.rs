//! Character-based chunking with word-boundary snapping.
//!
//! No notion of syntax here — plain extracted text is sliced on a target
//! size with fixed overlap, snapping the boundary to nearby whitespace or
//! punctuation so words are not split mid-token. Indices are over `char`s,
//! never raw bytes, so a multi-byte UTF-8 sequence can never be sliced in
//! half.

const BOUNDARY_CHARS: [char; 6] = [' ', '\n', '\t', '.', '!', '?'];

/// Splits `text` into overlapping chunks of roughly `chunk_size` characters.
/// Returns an empty vector only if `text` is entirely whitespace.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let len = chars.len();

    while start < len {
        let mut end = (start + chunk_size).min(len);
        if end < len {
            let floor = (start + chunk_size / 2).max(start);
            let mut snapped = None;
            for i in (floor..end).rev() {
                if BOUNDARY_CHARS.contains(&chars[i]) {
                    snapped = Some(i + 1);
                    break;
                }
            }
            if let Some(s) = snapped {
                end = s;
            }
        }

        let slice: String = chars[start..end].iter().collect();
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= len {
            break;
        }
        let next_start = end.saturating_sub(chunk_overlap);
        if next_start <= start {
            // Overlap would not advance the window; force progress.
            start = end;
        } else {
            start = next_start;
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("hello world", 1000, 100);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("   \n\t  ", 1000, 100).is_empty());
    }

    #[test]
    fn long_text_is_split_with_overlap() {
        let text = "a".repeat(50) + " " + &"b".repeat(50) + " " + &"c".repeat(50);
        let chunks = chunk_text(&text, 60, 10);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 61, "chunk exceeds size + slack: {}", chunk.len());
        }
    }

    #[test]
    fn chunks_cover_every_character_at_least_once() {
        let text = "word ".repeat(400);
        let chunks = chunk_text(&text, 100, 20);
        let joined: String = chunks.join("");
        for word in text.split_whitespace() {
            assert!(joined.contains(word));
        }
    }

    #[test]
    fn boundary_snaps_to_whitespace_not_mid_word() {
        let text = format!("{}. {}", "x".repeat(40), "y".repeat(40));
        let chunks = chunk_text(&text, 45, 5);
        assert!(!chunks.is_empty());
        // First chunk should end at the sentence boundary, not mid-run of x's or y's.
        assert!(chunks[0].ends_with('.') || chunks[0].chars().all(|c| c == 'x'));
    }

    #[test]
    fn multibyte_text_never_splits_a_codepoint() {
        let text = "café ".repeat(100);
        let chunks = chunk_text(&text, 30, 5);
        for chunk in &chunks {
            assert!(std::str::from_utf8(chunk.as_bytes()).is_ok());
        }
    }

    #[test]
    fn progress_is_guaranteed_even_with_large_overlap() {
        let text = "x".repeat(500);
        let chunks = chunk_text(&text, 50, 49);
        assert!(!chunks.is_empty());
        assert!(chunks.len() < 500);
    }
}
