//! Markup stripping and sentence splitting shared by every analyzer.
//!
//! Boundaries are runs of `.`, `!` or `?`, plus blank-line paragraph breaks.
//! Abbreviations ("Dr.") and ellipses are not special-cased, so they split
//! sentences too.

use regex::Regex;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();
static PARAGRAPH_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn boundary_regex() -> &'static Regex {
    BOUNDARY_REGEX
        .get_or_init(|| Regex::new(r"[.!?]+|\n\s*\n").expect("boundary pattern is valid"))
}

fn paragraph_regex() -> &'static Regex {
    PARAGRAPH_REGEX.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"))
}

/// Replace every `<...>` tag with a single space
pub fn strip_markup(text: &str) -> String {
    tag_regex().replace_all(text, " ").into_owned()
}

/// Split already-cleaned text into trimmed, non-empty sentences
pub fn split_sentences(clean_text: &str) -> Vec<String> {
    boundary_regex()
        .split(clean_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split cleaned text on blank lines; the pieces are not trimmed
pub fn split_paragraphs(clean_text: &str) -> impl Iterator<Item = &str> {
    paragraph_regex().split(clean_text)
}

/// Strip markup, then split into sentences
pub fn segment(text: &str) -> Vec<String> {
    split_sentences(&strip_markup(text))
}
