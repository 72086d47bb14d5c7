//! Configuration management
//!
//! The configuration is loaded once at startup and handed to the components
//! that need it. Environment variables only feed the defaults.

use crate::error::{Result, StudyRootError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Subject indexes keyed by subject key (e.g. "ai")
    #[serde(default = "default_subjects")]
    pub subjects: BTreeMap<String, SubjectConfig>,

    /// Directory relative subject paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_service: LLMServiceConfig::default(),
            subjects: default_subjects(),
            base_dir: PathBuf::from("."),
        }
    }
}

/// LLM service configuration for external inference
///
/// Fields missing from the config file fall back to the same environment
/// driven defaults as [`LLMServiceConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the chat completions service
    #[serde(default = "default_url")]
    pub url: String,

    /// Model name for answer generation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key for the chat completions service
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default = "default_embedding_url")]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key for the embeddings service
    #[serde(default = "default_embedding_api_key")]
    pub embedding_api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LLMServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_chat_model(),
            api_key: default_api_key(),
            embedding_url: default_embedding_url(),
            embedding_model: default_embedding_model(),
            embedding_api_key: default_embedding_api_key(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    std::env::var("STUDYROOT_LLM_URL").unwrap_or_else(|_| "https://api.groq.com/openai".to_string())
}

fn default_api_key() -> Option<String> {
    std::env::var("STUDYROOT_LLM_API_KEY")
        .or_else(|_| std::env::var("GROQ_API_KEY"))
        .ok()
        .filter(|k| !k.is_empty())
}

fn default_embedding_url() -> Option<String> {
    Some(
        std::env::var("STUDYROOT_EMBEDDING_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string()),
    )
}

fn default_embedding_api_key() -> Option<String> {
    std::env::var("STUDYROOT_EMBEDDING_API_KEY").ok()
}

fn default_chat_model() -> String {
    std::env::var("STUDYROOT_LLM_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("STUDYROOT_EMBEDDING_MODEL").unwrap_or_else(|_| "nomic-embed-text".to_string())
}

fn default_timeout() -> u64 {
    std::env::var("STUDYROOT_LLM_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30)
}

/// Per-subject index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Directory holding the subject's vector index
    pub path: PathBuf,

    /// Display labels that map onto this subject key
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn default_subjects() -> BTreeMap<String, SubjectConfig> {
    let mut subjects = BTreeMap::new();
    subjects.insert(
        "ai".to_string(),
        SubjectConfig {
            path: PathBuf::from("vectorstore/ai"),
            aliases: vec!["Artificial Intelligence".to_string()],
        },
    );
    subjects.insert(
        "ml".to_string(),
        SubjectConfig {
            path: PathBuf::from("vectorstore/ml"),
            aliases: vec!["Machine Learning".to_string()],
        },
    );
    subjects
}

impl Config {
    /// Load config from `STUDYROOT_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("STUDYROOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Map a subject display label to its subject key.
    ///
    /// Configured aliases win; anything else is lower-cased.
    pub fn subject_key(&self, label: &str) -> String {
        self.subjects
            .iter()
            .find(|(_, subject)| subject.aliases.iter().any(|alias| alias == label))
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| label.to_lowercase())
    }

    /// Resolve a subject key to its index directory
    pub fn subject_path(&self, key: &str) -> Result<PathBuf> {
        let subject = self
            .subjects
            .get(key)
            .ok_or_else(|| StudyRootError::unknown_subject(key))?;

        if subject.path.is_absolute() {
            Ok(subject.path.clone())
        } else {
            Ok(self.base_dir.join(&subject.path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_key_aliases() {
        let config = Config::default();
        assert_eq!(config.subject_key("Artificial Intelligence"), "ai");
        assert_eq!(config.subject_key("Machine Learning"), "ml");
        assert_eq!(config.subject_key("Physics"), "physics");
    }

    #[test]
    fn test_subject_path_unknown() {
        let config = Config::default();
        let err = config.subject_path("physics").unwrap_err();
        assert!(matches!(err, StudyRootError::Config(_)));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(
            &path,
            "llm_service:\n  url: http://localhost:9000\n  timeout_secs: 5\nsubjects:\n  os:\n    path: indexes/os\n    aliases: [\"Operating Systems\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm_service.url, "http://localhost:9000");
        assert_eq!(config.llm_service.timeout_secs, 5);
        assert_eq!(config.subject_key("Operating Systems"), "os");
        assert_eq!(
            config.subject_path("os").unwrap(),
            temp.path().join("indexes/os")
        );
        assert!(config.subject_path("ai").is_err());
    }

    #[test]
    fn test_partial_llm_service_keeps_env_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "llm_service:\n  url: https://api.groq.com/openai\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        let defaults = LLMServiceConfig::default();
        assert_eq!(config.llm_service.url, "https://api.groq.com/openai");
        assert_eq!(config.llm_service.api_key, defaults.api_key);
        assert_eq!(config.llm_service.embedding_api_key, defaults.embedding_api_key);
        assert!(config.llm_service.embedding_url.is_some());
        assert_eq!(
            config.llm_service.embeddings_url(),
            defaults.embeddings_url()
        );
        assert_ne!(config.llm_service.embeddings_url(), config.llm_service.url);
    }

    #[test]
    fn test_empty_llm_service_block_uses_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "llm_service: {}\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        let defaults = LLMServiceConfig::default();
        assert_eq!(config.llm_service.url, defaults.url);
        assert_eq!(config.llm_service.model, defaults.model);
        assert_eq!(config.llm_service.api_key, defaults.api_key);
        assert_eq!(config.llm_service.timeout_secs, defaults.timeout_secs);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("nope.yml")).unwrap();
        assert!(config.subjects.contains_key("ai"));
        assert!(config.subjects.contains_key("ml"));
    }
}
