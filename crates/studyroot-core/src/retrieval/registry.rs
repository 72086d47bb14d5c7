//! Process-wide cache of loaded subject indexes

use super::index::VectorIndex;
use crate::config::Config;
use crate::error::{Result, StudyRootError};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Maps subject keys to index directories and keeps loaded indexes around.
///
/// Indexes are immutable once loaded and shared between requests. Two
/// requests racing on a cold subject may both load it; the first insert wins.
pub struct IndexRegistry {
    locations: BTreeMap<String, PathBuf>,
    loaded: RwLock<HashMap<String, Arc<VectorIndex>>>,
}

impl IndexRegistry {
    /// Create from subject key -> index directory pairs
    pub fn new(locations: BTreeMap<String, PathBuf>) -> Self {
        Self {
            locations,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Create from the configured subjects
    pub fn from_config(config: &Config) -> Result<Self> {
        let locations = config
            .subjects
            .keys()
            .map(|key| Ok((key.clone(), config.subject_path(key)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self::new(locations))
    }

    /// Index directory for a subject key
    pub fn location(&self, key: &str) -> Result<&Path> {
        self.locations
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| StudyRootError::unknown_subject(key))
    }

    /// Get a subject's index, loading it on first use
    pub fn get(&self, key: &str) -> Result<Arc<VectorIndex>> {
        if let Some(index) = self.cached(key) {
            return Ok(index);
        }

        let dir = self.location(key)?;
        let index = Arc::new(VectorIndex::load(dir)?);
        tracing::info!(
            "Loaded index for subject '{}' from {} ({} embeddings)",
            key,
            dir.display(),
            index.len()
        );

        let mut loaded = self
            .loaded
            .write()
            .map_err(|e| StudyRootError::Index(format!("Index registry lock poisoned: {}", e)))?;
        Ok(loaded.entry(key.to_string()).or_insert(index).clone())
    }

    /// Like [`get`](Self::get), but a cold index is loaded on the blocking pool
    pub async fn fetch(self: &Arc<Self>, key: &str) -> Result<Arc<VectorIndex>> {
        if let Some(index) = self.cached(key) {
            return Ok(index);
        }

        let registry = Arc::clone(self);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || registry.get(&key))
            .await
            .map_err(|e| StudyRootError::Index(format!("Index load task failed: {}", e)))?
    }

    /// Whether a subject's index is already in memory
    pub fn is_loaded(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    /// Configured subject keys with their index directories
    pub fn subjects(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.locations
            .iter()
            .map(|(key, path)| (key.as_str(), path.as_path()))
    }

    fn cached(&self, key: &str) -> Option<Arc<VectorIndex>> {
        self.loaded.read().ok()?.get(key).cloned()
    }
}
