//! Character name detection.
//!
//! Three independent passes each produce their own [`Tally`]:
//!
//! 1. dialogue attribution: `said Alex` / `Alex said` within a sentence
//! 2. quoted speech: `"...", Alex said` across each cleaned paragraph
//! 3. introduction context: `met Alex`, admitted only when seen often enough
//!
//! The tallies are folded together, filtered and ranked by count.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::lexicon::Lexicon;
use crate::schema::CharacterCandidate;
use crate::segmenter::{split_paragraphs, split_sentences, strip_markup};
use crate::tally::{Tally, TallyEntry};

pub const DIALOGUE_VERBS: &[&str] = &[
    "said", "thought", "asked", "replied", "answered", "whispered", "shouted", "exclaimed",
    "murmured", "called", "told",
];

pub const INTRO_VERBS: &[&str] = &[
    "met", "saw", "knew", "told", "asked", "called", "named", "introduced",
];

/// One or two consecutive capitalized words
pub(crate) const NAME_PATTERN: &str = r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?";

/// How far before a quotation the context window may start
const QUOTE_LEAD_CHARS: usize = 50;
const MIN_QUOTE_WINDOW_LEN: usize = 20;

struct CharacterPatterns {
    /// (`verb Name`, `Name verb`) per dialogue verb
    dialogue: Vec<(Regex, Regex)>,
    intro: Vec<Regex>,
    quoted: Regex,
    bare_fragment: Regex,
    quote_window: Regex,
}

static PATTERNS: OnceLock<CharacterPatterns> = OnceLock::new();

/// Trigger word, then a name. The trigger is case-insensitive, the name is not.
pub(crate) fn trigger_then_name(trigger: &str) -> Regex {
    Regex::new(&format!(r"(?i:\b{trigger}\b)\s+({NAME_PATTERN})"))
        .expect("trigger pattern is valid")
}

fn name_then_trigger(trigger: &str) -> Regex {
    Regex::new(&format!(r"\b({NAME_PATTERN})\s+(?i:{trigger}\b)"))
        .expect("trigger pattern is valid")
}

fn patterns() -> &'static CharacterPatterns {
    PATTERNS.get_or_init(|| {
        let dialogue = DIALOGUE_VERBS
            .iter()
            .map(|verb| (trigger_then_name(verb), name_then_trigger(verb)))
            .collect();
        let intro = INTRO_VERBS.iter().map(|verb| trigger_then_name(verb)).collect();

        CharacterPatterns {
            dialogue,
            intro,
            quoted: Regex::new(&format!(r#"["'`][^"'`]+["'`]\s*,\s*({NAME_PATTERN})\s+\w+"#))
                .expect("quote pattern is valid"),
            bare_fragment: Regex::new(&format!(
                r#"(?i)^["']?\s*\p{{L}}+\s+(?:{})\s*["']?$"#,
                DIALOGUE_VERBS.join("|")
            ))
            .expect("fragment pattern is valid"),
            quote_window: Regex::new(r#"(?i)["'`][^"'`]+["'`]\s*,\s*\p{L}+\s+\w+"#)
                .expect("quote window pattern is valid"),
        }
    })
}

/// Collapse the whitespace a two-word match may span ("Maria\n  Lopez")
fn canonical_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn extract(
    text: &str,
    config: &ExtractorConfig,
    lexicon: &Lexicon,
) -> Vec<CharacterCandidate> {
    let clean_text = strip_markup(text);
    let sentences = split_sentences(&clean_text);

    let dialogue = dialogue_pass(&sentences, config, lexicon);
    let quoted = quoted_speech_pass(&clean_text, lexicon);
    let intro = introduction_pass(&sentences, lexicon);

    debug!(
        sentences = sentences.len(),
        dialogue_names = dialogue.len(),
        quoted_names = quoted.len(),
        intro_names = intro.len(),
        "Character passes complete"
    );

    let merged = merge_passes(dialogue, quoted, intro, config);

    merged
        .into_ranked()
        .into_iter()
        .filter(|entry| {
            entry.count >= config.min_character_count && lexicon.accepts_character(&entry.name)
        })
        .map(|TallyEntry { name, count, context }| CharacterCandidate {
            name,
            count,
            context,
        })
        .collect()
}

/// Passes 1 and 2 always admit; pass 3 only adds names nobody else found,
/// and only once they clear their own threshold.
fn merge_passes(dialogue: Tally, quoted: Tally, intro: Tally, config: &ExtractorConfig) -> Tally {
    let mut merged = dialogue;
    merged.absorb(quoted, config.max_context_samples);
    merged.admit_new(intro, config.min_intro_mentions);
    merged
}

fn dialogue_pass(sentences: &[String], config: &ExtractorConfig, lexicon: &Lexicon) -> Tally {
    let patterns = patterns();
    let mut tally = Tally::new();

    for sentence in sentences {
        for (verb_first, name_first) in &patterns.dialogue {
            for regex in [verb_first, name_first] {
                for caps in regex.captures_iter(sentence) {
                    let name = canonical_name(&caps[1]);
                    if !lexicon.accepts_name(&name) {
                        continue;
                    }

                    let entry = tally.hit(&name);
                    if entry.context.len() < config.max_context_samples {
                        if let Some(context) = dialogue_context(sentence, config) {
                            entry.context.push(context);
                        }
                    }
                }
            }
        }
    }

    tally
}

/// Pick the sentence text worth showing for a dialogue hit, if any.
///
/// When the sentence holds a quotation followed by its tag (`"Go", Tom said`)
/// the window starts a little before the quotation; otherwise the whole
/// sentence is used.
fn dialogue_context(sentence: &str, config: &ExtractorConfig) -> Option<String> {
    let patterns = patterns();
    let trimmed = sentence.trim();

    if trimmed.chars().count() < config.min_context_len || patterns.bare_fragment.is_match(trimmed)
    {
        return None;
    }

    match patterns.quote_window.find(sentence) {
        Some(m) => {
            let start = back_up_chars(sentence, m.start(), QUOTE_LEAD_CHARS);
            let window = sentence[start..].trim();
            (window.chars().count() >= MIN_QUOTE_WINDOW_LEN).then(|| window.to_string())
        }
        None => Some(trimmed.to_string()),
    }
}

/// Byte offset `n` characters before `byte_idx`, clamped to the start
fn back_up_chars(s: &str, byte_idx: usize, n: usize) -> usize {
    if n == 0 {
        return byte_idx;
    }
    s[..byte_idx]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Runs on whole paragraphs so a tag right after a closing quote is caught
/// even when the quotation itself ends with sentence punctuation. Quote pairs
/// never span a blank line.
fn quoted_speech_pass(clean_text: &str, lexicon: &Lexicon) -> Tally {
    let mut tally = Tally::new();

    for paragraph in split_paragraphs(clean_text) {
        for caps in patterns().quoted.captures_iter(paragraph) {
            let name = canonical_name(&caps[1]);
            if lexicon.accepts_name(&name) {
                tally.hit(&name);
            }
        }
    }

    tally
}

fn introduction_pass(sentences: &[String], lexicon: &Lexicon) -> Tally {
    let mut tally = Tally::new();

    for sentence in sentences {
        for regex in &patterns().intro {
            for caps in regex.captures_iter(sentence) {
                let name = canonical_name(&caps[1]);
                if lexicon.accepts_name(&name) {
                    tally.hit(&name);
                }
            }
        }
    }

    tally
}
