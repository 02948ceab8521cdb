use anyhow::{Context, Result};
use extract::ExtractorConfig;
use ingest::ReaderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extractor: ExtractorConfig,
    pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    /// When set, `/parse/path` only reads below this folder
    pub corpus_root: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 8 * 1024 * 1024,
            corpus_root: None,
        }
    }
}

pub const CONFIG_FILE_VAR: &str = "NARRATIVE_CONFIG";
pub const BIND_VAR: &str = "NARRATIVE_BIND";
pub const TIMEOUT_VAR: &str = "NARRATIVE_TIMEOUT_SECS";
pub const MAX_BODY_VAR: &str = "NARRATIVE_MAX_BODY_BYTES";
pub const CORPUS_ROOT_VAR: &str = "NARRATIVE_CORPUS_ROOT";

impl AppConfig {
    /// Defaults, then the JSON file named by `NARRATIVE_CONFIG`, then env overrides
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .context(format!("Failed to read config file: {}", path))?;
                serde_json::from_str(&raw)
                    .context(format!("Failed to parse config file: {}", path))?
            }
            None => AppConfig::default(),
        };

        if let Some(bind) = lookup(BIND_VAR) {
            config.server.bind_addr = bind;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.server.request_timeout_secs = secs
                .parse()
                .context(format!("{} must be a number of seconds", TIMEOUT_VAR))?;
        }
        if let Some(bytes) = lookup(MAX_BODY_VAR) {
            config.server.max_body_bytes = bytes
                .parse()
                .context(format!("{} must be a byte count", MAX_BODY_VAR))?;
        }
        if let Some(root) = lookup(CORPUS_ROOT_VAR) {
            config.server.corpus_root = Some(PathBuf::from(root));
        }

        if config.server.request_timeout_secs == 0 {
            anyhow::bail!("{} must be greater than zero", TIMEOUT_VAR);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert!(config.server.corpus_root.is_none());
        assert_eq!(config.extractor, ExtractorConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (BIND_VAR, "127.0.0.1:8080"),
            (TIMEOUT_VAR, "5"),
            (CORPUS_ROOT_VAR, "/srv/stories"),
        ]))
        .unwrap();

        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.server.request_timeout_secs, 5);
        assert_eq!(config.server.corpus_root, Some(PathBuf::from("/srv/stories")));
    }

    #[test]
    fn test_bad_numbers_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(MAX_BODY_VAR, "-1")])).is_err());
    }

    #[test]
    fn test_config_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"server": {"bind_addr": "127.0.0.1:9000"}, "extractor": {"min_character_count": 3}}"#,
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let config = AppConfig::from_lookup(lookup_from(&[(CONFIG_FILE_VAR, path.as_str())])).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.extractor.min_character_count, 3);

        let config = AppConfig::from_lookup(lookup_from(&[
            (CONFIG_FILE_VAR, path.as_str()),
            (BIND_VAR, "127.0.0.1:9001"),
        ]))
        .unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9001");
    }
}
