use std::collections::HashSet;
use tracing::{debug, info};

use crate::Extractor;
use crate::error::{ParseError, Result};
use crate::schema::{Document, ExtractionResult};

/// Placed between documents. A blank line ends a sentence and a paragraph, so
/// neither a sentence nor a quote pair spans two documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Every document needs a non-blank name, unique within the list
pub fn validate_documents(documents: &[Document]) -> Result<()> {
    let mut seen = HashSet::new();

    for (idx, doc) in documents.iter().enumerate() {
        if doc.name.trim().is_empty() {
            return Err(ParseError::InvalidArgument(format!(
                "document at index {idx} has an empty name"
            )));
        }
        if !seen.insert(doc.name.as_str()) {
            return Err(ParseError::InvalidArgument(format!(
                "duplicate document name: {}",
                doc.name
            )));
        }
    }

    Ok(())
}

pub fn join_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

/// Characters and locations come from one pass over the joined corpus; the
/// character names found there seed the relationship pass over the same text.
pub(crate) fn parse(extractor: &Extractor, documents: &[Document]) -> Result<ExtractionResult> {
    validate_documents(documents)?;

    if documents.is_empty() {
        return Ok(ExtractionResult::default());
    }

    let corpus = join_documents(documents);
    debug!(documents = documents.len(), corpus_bytes = corpus.len(), "Corpus assembled");

    let characters = extractor.extract_characters(&corpus);
    let locations = extractor.extract_locations(&corpus);

    let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
    let relationships = extractor.analyze_relationships(&corpus, &names);

    let result = ExtractionResult {
        characters,
        locations,
        relationships,
    };

    let summary = result.summary();
    info!(
        documents = documents.len(),
        characters = summary.characters,
        locations = summary.locations,
        relationships = summary.relationships,
        "Corpus parsed"
    );

    Ok(result)
}
