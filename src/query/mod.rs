//! Translates a user query string into an FTS5 match expression.
//!
//! Deliberately simple: extract quoted phrases, drop short tokens, add
//! prefix wildcards to the rest, join everything with AND for precision.

use once_cell::sync::Lazy;
use regex::Regex;

static PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());
static NON_TERM_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.]").unwrap());

const MIN_TOKEN_LEN: usize = 2;
const PREFIX_WILDCARD_MIN_LEN: usize = 3;

/// Parses `query` into an FTS5 expression. Returns `None` for the match-all
/// case — the caller must omit the `MATCH` clause entirely rather than pass
/// a literal wildcard, since FTS5 has none.
pub fn parse(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut phrases = Vec::new();
    for cap in PHRASE_RE.captures_iter(trimmed) {
        let phrase = cap[1].trim();
        if !phrase.is_empty() {
            phrases.push(format!("\"{phrase}\""));
        }
    }

    let remainder = PHRASE_RE.replace_all(trimmed, " ");
    let mut terms = Vec::new();
    for raw_token in remainder.split_whitespace() {
        let cleaned = NON_TERM_CHAR_RE.replace_all(raw_token, "").into_owned();
        if cleaned.chars().count() < MIN_TOKEN_LEN {
            continue;
        }
        if cleaned.chars().count() >= PREFIX_WILDCARD_MIN_LEN {
            terms.push(format!("{cleaned}*"));
        } else {
            terms.push(cleaned);
        }
    }

    let mut parts = phrases;
    parts.extend(terms);

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_match_all() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(parse("a"), None);
    }

    #[test]
    fn two_char_token_kept_bare() {
        assert_eq!(parse("ab"), Some("ab".to_string()));
    }

    #[test]
    fn three_char_token_gets_prefix_wildcard() {
        assert_eq!(parse("cat"), Some("cat*".to_string()));
    }

    #[test]
    fn multiple_terms_joined_with_and() {
        assert_eq!(parse("foo bar"), Some("foo* AND bar*".to_string()));
    }

    #[test]
    fn quoted_phrase_is_preserved_verbatim() {
        assert_eq!(parse(r#""exact phrase""#), Some("\"exact phrase\"".to_string()));
    }

    #[test]
    fn phrase_plus_terms_combine() {
        assert_eq!(
            parse(r#""hello world" foo"#),
            Some("\"hello world\" AND foo*".to_string())
        );
    }

    #[test]
    fn special_characters_are_stripped_from_terms() {
        assert_eq!(parse("foo!!"), Some("foo*".to_string()));
    }
}
