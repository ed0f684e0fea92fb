//! Utility functions for link classification and string handling.
//!
//! This module provides helper functions used throughout the pipeline:
//! - Article-link classification for listing entries
//! - Character-safe truncation for error markers and logging
//! - Whitespace collapsing to approximate rendered element text

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters kept in a card's `error` field.
pub const ERROR_MAX_CHARS: usize = 180;

static ARTICLE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.ghtml(?:$|\?)").unwrap());

/// Classify a URL as an article page.
///
/// Article pages on the portal end in `.ghtml`, optionally followed by a
/// query string. Section fronts, videos and external links do not.
///
/// # Examples
///
/// ```ignore
/// assert!(is_article_link("https://g1.globo.com/x/noticia/2024/05/01/y.ghtml"));
/// assert!(is_article_link("https://g1.globo.com/y.ghtml?utm_source=home"));
/// assert!(!is_article_link("https://g1.globo.com/y.ghtml#comments"));
/// ```
pub fn is_article_link(href: &str) -> bool {
    !href.is_empty() && ARTICLE_LINK.is_match(href)
}

/// Keep at most `max` characters of `s`.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Concatenate text fragments, then collapse every whitespace run to a
/// single space and trim the ends.
pub fn collapse_whitespace<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}
