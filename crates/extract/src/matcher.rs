use regex::{Regex, RegexBuilder};

use crate::error::{ParseError, Result};

/// Case-insensitive whole-word matcher for a literal string.
///
/// The literal is escaped before compilation, so names like `Mr. (Bob)` are
/// matched verbatim rather than interpreted as a pattern.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    literal: String,
    regex: Regex,
}

impl WordMatcher {
    pub fn new(literal: &str) -> Result<Self> {
        let trimmed = literal.trim();
        if trimmed.is_empty() {
            return Err(ParseError::InvalidArgument(
                "cannot build a matcher for an empty name".to_string(),
            ));
        }

        let pattern = format!(r"\b{}\b", regex::escape(trimmed));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ParseError::InvalidArgument(format!("unusable name {trimmed:?}: {e}")))?;

        Ok(Self {
            literal: trimmed.to_string(),
            regex,
        })
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}
