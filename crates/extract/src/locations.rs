use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::characters::trigger_then_name;
use crate::schema::LocationCandidate;
use crate::segmenter::segment;
use crate::tally::Tally;

pub const PREPOSITIONS: &[&str] = &["in", "at", "to", "from", "near", "inside", "outside", "within"];

static PREPOSITION_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn preposition_patterns() -> &'static [Regex] {
    PREPOSITION_PATTERNS
        .get_or_init(|| PREPOSITIONS.iter().map(|p| trigger_then_name(p)).collect())
}

/// Capitalized spans right after a place preposition ("near Rivendell").
///
/// Deliberately loose: there is no count floor and no stop list, so callers
/// get every candidate and decide for themselves.
pub(crate) fn extract(text: &str) -> Vec<LocationCandidate> {
    let sentences = segment(text);
    let mut tally = Tally::new();

    for sentence in &sentences {
        for regex in preposition_patterns() {
            for caps in regex.captures_iter(sentence) {
                let name = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
                let len = name.chars().count();
                if len > 2 && len < 30 {
                    tally.hit(&name);
                }
            }
        }
    }

    debug!(sentences = sentences.len(), locations = tally.len(), "Location pass complete");

    tally
        .into_ranked()
        .into_iter()
        .map(|entry| LocationCandidate {
            name: entry.name,
            count: entry.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepositions() {
        let found = extract("They rode to Rivendell. Later they rested near Rivendell. Bilbo stayed in Bag End.");

        assert_eq!(found[0].name, "Rivendell");
        assert_eq!(found[0].count, 2);
        assert!(found.iter().any(|l| l.name == "Bag End" && l.count == 1));
    }

    #[test]
    fn test_no_count_floor() {
        let found = extract("She grew up in Lisbon.");
        assert_eq!(found, vec![LocationCandidate { name: "Lisbon".to_string(), count: 1 }]);
    }

    #[test]
    fn test_lowercase_words_ignored() {
        assert!(extract("He walked in the forest and sat at home.").is_empty());
    }

    #[test]
    fn test_length_bounds() {
        // Two characters is too short
        assert!(extract("Meet me at Ur.").is_empty());
        assert_eq!(extract("Meet me at Ura.").len(), 1);
    }

    #[test]
    fn test_preposition_is_case_insensitive() {
        let found = extract("In Paris it rained. Inside Paris it poured.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].count, 2);
    }

    #[test]
    fn test_markup_is_stripped() {
        let found = extract("<p>They sailed from <em>Gondor</em>.</p>");
        assert_eq!(found[0].name, "Gondor");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let found = extract("From Oslo we went to Bergen.");
        let names: Vec<_> = found.iter().map(|l| l.name.as_str()).collect();
        // Patterns run per preposition, "to" is checked before "from"
        assert_eq!(names, vec!["Bergen", "Oslo"]);
    }
}
