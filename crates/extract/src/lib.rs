//! Heuristic character, location and relationship extraction for narrative text.
//!
//! Everything here is pure: no I/O, no model files, no state kept between
//! calls. The free functions use the default thresholds and word lists; build
//! an [`Extractor`] to change either.

pub mod characters;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod locations;
pub mod matcher;
pub mod relationships;
pub mod schema;
pub mod segmenter;
pub mod tally;

pub use config::ExtractorConfig;
pub use corpus::{DOCUMENT_SEPARATOR, join_documents, validate_documents};
pub use error::{ParseError, Result};
pub use lexicon::Lexicon;
pub use matcher::WordMatcher;
pub use schema::{
    CharacterCandidate, Document, ExtractionResult, LocationCandidate, RelationshipEdge,
    ResultSummary,
};
pub use segmenter::segment;

use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
    lexicon: Lexicon,
}

impl Extractor {
    pub fn new(config: ExtractorConfig, lexicon: Lexicon) -> Self {
        Self { config, lexicon }
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self::new(config, Lexicon::default())
    }

    /// Candidate character names, most frequent first
    pub fn extract_characters(&self, text: &str) -> Vec<CharacterCandidate> {
        characters::extract(text, &self.config, &self.lexicon)
    }

    /// Candidate place names, most frequent first
    pub fn extract_locations(&self, text: &str) -> Vec<LocationCandidate> {
        locations::extract(text)
    }

    /// Co-occurrence edges between the given names, strongest first
    pub fn analyze_relationships<S: AsRef<str>>(
        &self,
        text: &str,
        character_names: &[S],
    ) -> Vec<RelationshipEdge> {
        relationships::analyze(text, character_names, &self.config)
    }

    /// Run every analyzer over the documents joined into one corpus
    pub fn parse_files(&self, documents: &[Document]) -> Result<ExtractionResult> {
        corpus::parse(self, documents)
    }
}

static DEFAULT_EXTRACTOR: OnceLock<Extractor> = OnceLock::new();

fn default_extractor() -> &'static Extractor {
    DEFAULT_EXTRACTOR.get_or_init(Extractor::default)
}

pub fn extract_characters(text: &str) -> Vec<CharacterCandidate> {
    default_extractor().extract_characters(text)
}

pub fn extract_locations(text: &str) -> Vec<LocationCandidate> {
    default_extractor().extract_locations(text)
}

pub fn analyze_relationships<S: AsRef<str>>(
    text: &str,
    character_names: &[S],
) -> Vec<RelationshipEdge> {
    default_extractor().analyze_relationships(text, character_names)
}

pub fn parse_files(documents: &[Document]) -> Result<ExtractionResult> {
    default_extractor().parse_files(documents)
}
