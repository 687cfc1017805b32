use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:7500".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Results requested per page.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Optional centroid probe count forwarded to the search endpoint.
    #[serde(default)]
    pub centroids: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            centroids: None,
        }
    }
}

fn default_window_size() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Extracted documents are truncated to this many characters before upload.
    #[serde(default = "default_max_document_chars")]
    pub max_document_chars: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_document_chars: default_max_document_chars(),
        }
    }
}

fn default_max_document_chars() -> usize {
    5000
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    /// Directory holding the persisted owner identifier.
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./state")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.api.base_url.trim().is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }

    if config.search.window_size == 0 {
        anyhow::bail!("search.window_size must be >= 1");
    }

    if config.ingest.max_document_chars == 0 {
        anyhow::bail!("ingest.max_document_chars must be >= 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.search.window_size, 3);
        assert_eq!(config.ingest.max_document_chars, 5000);
        assert_eq!(config.api.base_url, "http://localhost:7500");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://example.test:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://example.test:9000");
        assert_eq!(config.search.window_size, 3);
        assert_eq!(config.ingest.max_document_chars, 5000);
    }

    #[test]
    fn zero_window_size_rejected() {
        let config: Config = toml::from_str(
            r#"
            [search]
            window_size = 0
            "#,
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn empty_base_url_rejected() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = ""
            "#,
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }
}
