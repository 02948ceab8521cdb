use anyhow::{Context, Result};
use extract::Document;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Lowercase extensions without the dot
    pub extensions: Vec<String>,
    /// Descend into subfolders
    pub recursive: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            extensions: ["txt", "md", "markdown", "html", "htm"].map(String::from).to_vec(),
            recursive: true,
        }
    }
}

impl ReaderConfig {
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

pub struct FileReader;

impl FileReader {
    /// Read one file; the document is named after the file
    pub async fn read_file(path: &Path, config: &ReaderConfig) -> Result<Document> {
        if !config.accepts(path) {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            anyhow::bail!("Unsupported file format: {}", extension);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self::read_named(path, name).await
    }

    async fn read_named(path: &Path, name: String) -> Result<Document> {
        let bytes = fs::read(path)
            .await
            .context(format!("Failed to read file: {:?}", path))?;

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), "File is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Ok(Document { name, content })
    }

    /// Read every supported file under `dir`.
    ///
    /// Documents are named by their path relative to `dir` (always with `/`)
    /// and returned sorted by that name, so the same folder always yields the
    /// same corpus order.
    pub async fn read_directory(dir: &Path, config: &ReaderConfig) -> Result<Vec<Document>> {
        let root = dir.to_path_buf();
        let walk_config = config.clone();
        let paths = tokio::task::spawn_blocking(move || Self::collect_paths(&root, &walk_config))
            .await
            .context("Directory walk task failed")??;

        let mut documents = Vec::with_capacity(paths.len());
        for (name, path) in paths {
            documents.push(Self::read_named(&path, name).await?);
        }

        debug!(dir = %dir.display(), documents = documents.len(), "Directory read");
        Ok(documents)
    }

    /// Walk `dir` and return `(relative name, path)` pairs sorted by name
    fn collect_paths(dir: &Path, config: &ReaderConfig) -> Result<Vec<(String, PathBuf)>> {
        let max_depth = if config.recursive { usize::MAX } else { 1 };

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).max_depth(max_depth) {
            let entry = entry.context(format!("Failed to walk directory: {:?}", dir))?;
            let path = entry.path();

            if entry.file_type().is_file() && config.accepts(path) {
                let relative = path
                    .strip_prefix(dir)
                    .unwrap_or(path)
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                paths.push((relative, path.to_path_buf()));
            }
        }

        paths.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[test]
    fn test_accepts_extensions() {
        let config = ReaderConfig::default();
        assert!(config.accepts(Path::new("ch1.md")));
        assert!(config.accepts(Path::new("ch2.markdown")));
        assert!(config.accepts(Path::new("ch1.HTML")));
        assert!(!config.accepts(Path::new("cover.png")));
        assert!(!config.accepts(Path::new("README")));
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter.txt");
        std_fs::write(&path, "Tom said hi.").unwrap();

        let doc = FileReader::read_file(&path, &ReaderConfig::default()).await.unwrap();
        assert_eq!(doc.name, "chapter.txt");
        assert_eq!(doc.content, "Tom said hi.");
    }

    #[tokio::test]
    async fn test_read_file_rejects_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std_fs::write(&path, [0u8, 1, 2]).unwrap();

        assert!(FileReader::read_file(&path, &ReaderConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_read_directory_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::create_dir(dir.path().join("part2")).unwrap();
        std_fs::write(dir.path().join("part2/ch3.md"), "three").unwrap();
        std_fs::write(dir.path().join("b.txt"), "two").unwrap();
        std_fs::write(dir.path().join("c.markdown"), "four").unwrap();
        std_fs::write(dir.path().join("a.html"), "<p>one</p>").unwrap();
        std_fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let docs = FileReader::read_directory(dir.path(), &ReaderConfig::default())
            .await
            .unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.html", "b.txt", "c.markdown", "part2/ch3.md"]);

        let flat = ReaderConfig {
            recursive: false,
            ..Default::default()
        };
        let docs = FileReader::read_directory(dir.path(), &flat).await.unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.txt");
        std_fs::write(&path, [b'T', b'o', b'm', 0xff]).unwrap();

        let doc = FileReader::read_file(&path, &ReaderConfig::default()).await.unwrap();
        assert!(doc.content.starts_with("Tom"));
    }
}
