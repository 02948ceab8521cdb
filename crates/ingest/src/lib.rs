pub mod reader;

pub use reader::{FileReader, ReaderConfig};

use anyhow::{Context, Result};
use extract::Document;
use std::path::Path;
use tokio::fs;

/// Load a single file or a whole folder as documents
pub async fn load_corpus(path: &Path) -> Result<Vec<Document>> {
    load_corpus_with(path, &ReaderConfig::default()).await
}

pub async fn load_corpus_with(path: &Path, config: &ReaderConfig) -> Result<Vec<Document>> {
    let metadata = fs::metadata(path)
        .await
        .context(format!("Failed to stat path: {:?}", path))?;

    if metadata.is_file() {
        Ok(vec![FileReader::read_file(path, config).await?])
    } else if metadata.is_dir() {
        FileReader::read_directory(path, config).await
    } else {
        anyhow::bail!("Not a file or directory: {:?}", path)
    }
}
