use std::collections::HashSet;

/// Capitalized words that are never character names on their own
pub const STOP_WORDS: &[&str] = &[
    "The", "A", "An", "And", "But", "Or", "Nor", "For", "So", "Yet", "As", "If", "When", "Where",
    "Why", "How", "I", "He", "She", "They", "We", "You", "It", "This", "That", "These", "Those",
    "His", "Her", "Him", "Them", "Their", "Theirs", "Themselves", "Monday", "Tuesday",
    "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January", "February", "March",
    "April", "May", "June", "July", "August", "September", "October", "November", "December",
    "North", "South", "East", "West", "Northern", "Southern", "Eastern", "Western", "Chapter",
    "Part", "Section", "Page", "Expression", "Face", "Voice", "Hand", "Hands", "Eye", "Eyes",
];

/// Compared case-insensitively
pub const PRONOUNS: &[&str] = &[
    "they", "their", "them", "theirs", "themselves", "he", "she", "it", "we", "you", "i", "his",
    "her", "him",
];

/// Place nouns that the dialogue heuristics tend to pick up ("Tower said nothing")
pub const LOCATION_WORDS: &[&str] = &[
    "Forest", "Tower", "Keep", "City", "Village", "Town", "Kingdom", "Realm", "Palace", "Castle",
    "Temple", "Shrine",
];

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 30;

/// Word lists used to reject candidate names. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stop_words: HashSet<String>,
    pronouns: HashSet<String>,
    location_words: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(
            STOP_WORDS.iter().copied(),
            PRONOUNS.iter().copied(),
            LOCATION_WORDS.iter().copied(),
        )
    }
}

impl Lexicon {
    pub fn new<S, P, L>(stop_words: S, pronouns: P, location_words: L) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            stop_words: stop_words.into_iter().map(Into::into).collect(),
            pronouns: pronouns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
            location_words: location_words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_stop_word(&self, name: &str) -> bool {
        self.stop_words.contains(name)
    }

    pub fn is_pronoun(&self, name: &str) -> bool {
        self.pronouns.contains(&name.to_lowercase())
    }

    pub fn is_location_word(&self, name: &str) -> bool {
        self.location_words.contains(name)
    }

    /// Shape and word-list checks every heuristic applies before counting a name
    pub fn accepts_name(&self, name: &str) -> bool {
        let starts_upper = name.chars().next().is_some_and(char::is_uppercase);
        let len = name.chars().count();

        starts_upper
            && (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
            && !self.is_stop_word(name)
            && !self.is_pronoun(name)
            && !has_lowercase_word(name)
    }

    /// Final gate after all passes are merged
    pub fn accepts_character(&self, name: &str) -> bool {
        self.accepts_name(name) && !self.is_location_word(name)
    }
}

/// "their Expression" or "Alex quietly" style phrases
fn has_lowercase_word(name: &str) -> bool {
    name.split_whitespace()
        .any(|word| word.chars().all(char::is_lowercase))
}
