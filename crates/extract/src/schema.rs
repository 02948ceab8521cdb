use serde::{Deserialize, Serialize};

/// A caller-supplied text, markup included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCandidate {
    pub name: String,
    pub count: usize,
    /// Up to `max_context_samples` sentences, in the order they were seen
    pub context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub count: usize,
}

/// Undirected co-occurrence edge. `char1 < char2` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub char1: String,
    pub char2: String,
    pub strength: usize,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub characters: Vec<CharacterCandidate>,
    pub locations: Vec<LocationCandidate>,
    pub relationships: Vec<RelationshipEdge>,
}

impl ExtractionResult {
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            characters: self.characters.len(),
            locations: self.locations.len(),
            relationships: self.relationships.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.locations.is_empty() && self.relationships.is_empty()
    }

    pub fn character(&self, name: &str) -> Option<&CharacterCandidate> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Look up the edge for an unordered pair
    pub fn relationship(&self, a: &str, b: &str) -> Option<&RelationshipEdge> {
        self.relationships
            .iter()
            .find(|r| (r.char1 == a && r.char2 == b) || (r.char1 == b && r.char2 == a))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub characters: usize,
    pub locations: usize,
    pub relationships: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, b: &str) -> RelationshipEdge {
        RelationshipEdge {
            char1: a.to_string(),
            char2: b.to_string(),
            strength: 2,
            context: Vec::new(),
        }
    }

    #[test]
    fn test_relationship_lookup_is_unordered() {
        let result = ExtractionResult {
            relationships: vec![edge("Jane", "Tom")],
            ..Default::default()
        };

        assert!(result.relationship("Tom", "Jane").is_some());
        assert!(result.relationship("Jane", "Tom").is_some());
        assert!(result.relationship("Jane", "Bob").is_none());
    }

    #[test]
    fn test_wire_shape() {
        let result = ExtractionResult {
            characters: vec![CharacterCandidate {
                name: "Alex".to_string(),
                count: 3,
                context: vec!["Alex said hello".to_string()],
            }],
            locations: vec![LocationCandidate {
                name: "Paris".to_string(),
                count: 1,
            }],
            relationships: vec![edge("Alex", "Maria")],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["characters"][0]["name"], "Alex");
        assert_eq!(json["characters"][0]["count"], 3);
        assert_eq!(json["locations"][0]["name"], "Paris");
        assert_eq!(json["relationships"][0]["char1"], "Alex");
        assert_eq!(json["relationships"][0]["strength"], 2);
        assert_eq!(result.summary().characters, 1);
    }
}
