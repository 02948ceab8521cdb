use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::matcher::WordMatcher;
use crate::schema::RelationshipEdge;
use crate::segmenter::segment;

/// Order-independent key for a pair of names
fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Build one matcher per distinct, non-blank name, keeping the caller's order
fn build_matchers<S: AsRef<str>>(names: &[S]) -> Vec<WordMatcher> {
    let mut seen = HashSet::new();
    let mut matchers = Vec::new();

    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }
        match WordMatcher::new(name) {
            Ok(matcher) => matchers.push(matcher),
            Err(e) => warn!(name = name, error = %e, "Skipping name for relationship analysis"),
        }
    }

    matchers
}

/// Sentence-level co-occurrence between the supplied names.
///
/// Every pair of names found in the same sentence gets one unit of strength,
/// so a sentence with N names contributes N*(N-1)/2 increments.
pub(crate) fn analyze<S: AsRef<str>>(
    text: &str,
    names: &[S],
    config: &ExtractorConfig,
) -> Vec<RelationshipEdge> {
    let matchers = build_matchers(names);
    if matchers.len() < 2 {
        return Vec::new();
    }

    let sentences = segment(text);
    let mut edges: Vec<RelationshipEdge> = Vec::new();
    let mut pair_to_idx: HashMap<(String, String), usize> = HashMap::new();

    for sentence in &sentences {
        let present: Vec<&str> = matchers
            .iter()
            .filter(|m| m.is_match(sentence))
            .map(WordMatcher::literal)
            .collect();

        if present.len() < 2 {
            continue;
        }

        for (i, first) in present.iter().enumerate() {
            for second in &present[i + 1..] {
                let (char1, char2) = pair_key(first, second);
                let idx = *pair_to_idx
                    .entry((char1.to_string(), char2.to_string()))
                    .or_insert_with(|| {
                        edges.push(RelationshipEdge {
                            char1: char1.to_string(),
                            char2: char2.to_string(),
                            strength: 0,
                            context: Vec::new(),
                        });
                        edges.len() - 1
                    });

                let edge = &mut edges[idx];
                edge.strength += 1;
                if edge.context.len() < config.max_context_samples {
                    edge.context.push(sentence.clone());
                }
            }
        }
    }

    let candidate_edges = edges.len();
    edges.retain(|edge| edge.strength >= config.min_relationship_strength);
    edges.sort_by(|a, b| b.strength.cmp(&a.strength));

    debug!(
        sentences = sentences.len(),
        names = matchers.len(),
        candidate_edges,
        kept_edges = edges.len(),
        "Relationship pass complete"
    );

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, names: &[&str]) -> Vec<RelationshipEdge> {
        analyze(text, names, &ExtractorConfig::default())
    }

    #[test]
    fn test_alex_and_maria() {
        let text = r#"Alex said, "I am leaving." Maria looked at Alex and smiled. Alex said goodbye to Maria."#;
        let edges = run(text, &["Alex", "Maria"]);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].char1, "Alex");
        assert_eq!(edges[0].char2, "Maria");
        assert_eq!(edges[0].strength, 2);
        assert_eq!(
            edges[0].context,
            vec!["\" Maria looked at Alex and smiled", "Alex said goodbye to Maria"]
        );
    }

    #[test]
    fn test_pair_is_canonical() {
        let edges = run("Tom said hi to Jane. Jane said hi to Tom.", &["Tom", "Jane"]);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].char1.as_str(), edges[0].char2.as_str()), ("Jane", "Tom"));
        assert_eq!(edges[0].strength, 2);
    }

    #[test]
    fn test_single_shared_sentence_is_not_a_relationship() {
        let edges = run("Ann, Ben and Cal sat together. Ann left.", &["Ann", "Ben", "Cal"]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_crowded_sentence_counts_every_pair() {
        let text = "Ann, Ben and Cal ate. Ann, Ben and Cal slept.";
        let edges = run(text, &["Ann", "Ben", "Cal"]);

        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.strength == 2));
    }

    #[test]
    fn test_whole_word_case_insensitive() {
        let text = "ALEX met maria. alex and Maria argued. Alexander and Maria laughed.";
        let edges = run(text, &["Alex", "Maria"]);
        assert_eq!(edges[0].strength, 2);
    }

    #[test]
    fn test_ranked_by_strength() {
        let text = "Ann and Ben. Ann and Ben. Ann and Ben. Cal and Dee. Cal and Dee.";
        let edges = run(text, &["Cal", "Dee", "Ann", "Ben"]);
        assert_eq!(edges[0].char1, "Ann");
        assert_eq!(edges[0].strength, 3);
        assert_eq!(edges[1].char1, "Cal");
    }

    #[test]
    fn test_duplicate_and_blank_names() {
        let text = "Ann and Ben. Ann and Ben.";
        let edges = run(text, &["Ann", "Ann", " ", "", "Ben"]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].strength, 2);
    }

    #[test]
    fn test_metacharacter_names() {
        let text = "Bo+Bo met Amy. Amy ran with Bo+Bo.";
        let edges = run(text, &["Bo+Bo", "Amy"]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].strength, 2);
    }

    #[test]
    fn test_context_capped() {
        let text = "Ann saw Ben. ".repeat(8);
        let edges = run(&text, &["Ann", "Ben"]);
        assert_eq!(edges[0].strength, 8);
        assert_eq!(edges[0].context.len(), 5);
    }

    #[test]
    fn test_fewer_than_two_names() {
        assert!(run("Ann and Ben. Ann and Ben.", &["Ann"]).is_empty());
        assert!(run("Ann and Ben.", &[]).is_empty());
    }
}
