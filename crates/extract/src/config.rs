use serde::{Deserialize, Serialize};

/// Thresholds used by the extraction heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Characters seen fewer times than this are dropped as noise
    pub min_character_count: usize,
    /// Hits an introduction-only name ("met Sam") needs before it is admitted
    pub min_intro_mentions: usize,
    /// Edges with fewer shared sentences are dropped
    pub min_relationship_strength: usize,
    pub max_context_samples: usize,
    /// Shorter dialogue sentences are counted but not kept as context
    pub min_context_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_character_count: 2,
            min_intro_mentions: 2,
            min_relationship_strength: 2,
            max_context_samples: 5,
            min_context_len: 15,
        }
    }
}
