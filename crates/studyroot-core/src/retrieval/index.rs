//! Read-only subject vector index
//!
//! An index directory holds `manifest.json`, `embeddings.f32` (little-endian
//! f32 vectors, back to back) and `passages.json` (passage records, parallel
//! to the embeddings). Indexes are built elsewhere; this module only loads
//! and searches them.

use super::passage::Passage;
use super::vectors::{bytes_to_embedding, cosine_similarity};
use crate::error::{Result, StudyRootError};
use instant_distance::{Builder, HnswMap, Search};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const EMBEDDINGS_FILE: &str = "embeddings.f32";
pub const PASSAGES_FILE: &str = "passages.json";

/// Minimum embedding count to justify building an ANN index.
/// Below this threshold, brute-force is fast enough.
const ANN_THRESHOLD: usize = 1000;

/// Index manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub dimensions: usize,
    #[serde(default)]
    pub model: Option<String>,
}

/// Wrapper for f32 vectors implementing instant_distance::Point
#[derive(Clone)]
struct EmbeddingPoint {
    values: Vec<f32>,
}

impl instant_distance::Point for EmbeddingPoint {
    fn distance(&self, other: &Self) -> f32 {
        // Cosine distance = 1.0 - cosine_similarity
        1.0 - cosine_similarity(&self.values, &other.values)
    }
}

/// Embeddings plus the parallel passage sequence for one subject
pub struct VectorIndex {
    manifest: IndexManifest,
    embeddings: Vec<Vec<f32>>,
    passages: Vec<Passage>,
    ann: Option<HnswMap<EmbeddingPoint, usize>>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("dimensions", &self.manifest.dimensions)
            .field("embeddings", &self.embeddings.len())
            .field("passages", &self.passages.len())
            .field("ann", &self.ann.is_some())
            .finish()
    }
}

impl VectorIndex {
    /// Build from in-memory parts.
    ///
    /// Every embedding must have `manifest.dimensions` values.
    pub fn from_parts(
        manifest: IndexManifest,
        embeddings: Vec<Vec<f32>>,
        passages: Vec<Passage>,
    ) -> Result<Self> {
        if manifest.dimensions == 0 {
            return Err(StudyRootError::Index(
                "Index dimensions must be positive".to_string(),
            ));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != manifest.dimensions) {
            return Err(StudyRootError::Index(format!(
                "Embedding has {} dimensions, index expects {}",
                bad.len(),
                manifest.dimensions
            )));
        }

        let ann = if embeddings.len() >= ANN_THRESHOLD {
            let points: Vec<EmbeddingPoint> = embeddings
                .iter()
                .map(|values| EmbeddingPoint {
                    values: values.clone(),
                })
                .collect();
            let ids: Vec<usize> = (0..points.len()).collect();
            tracing::debug!("Building ANN index over {} embeddings", points.len());
            Some(Builder::default().build(points, ids))
        } else {
            None
        };

        Ok(Self {
            manifest,
            embeddings,
            passages,
            ann,
        })
    }

    /// Load an index directory
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest: IndexManifest =
            serde_json::from_slice(&read_index_file(dir, MANIFEST_FILE)?)?;
        if manifest.dimensions == 0 {
            return Err(StudyRootError::Index(format!(
                "{}: dimensions must be positive",
                dir.display()
            )));
        }

        let bytes = read_index_file(dir, EMBEDDINGS_FILE)?;
        let stride = manifest.dimensions * 4;
        if bytes.len() % stride != 0 {
            return Err(StudyRootError::Index(format!(
                "{}: {} bytes is not a whole number of {}-dimension vectors",
                dir.join(EMBEDDINGS_FILE).display(),
                bytes.len(),
                manifest.dimensions
            )));
        }
        let embeddings: Vec<Vec<f32>> = bytes.chunks_exact(stride).map(bytes_to_embedding).collect();

        let passages: Vec<Passage> = serde_json::from_slice(&read_index_file(dir, PASSAGES_FILE)?)?;

        if passages.len() != embeddings.len() {
            tracing::warn!(
                "{}: {} embeddings but {} passages",
                dir.display(),
                embeddings.len(),
                passages.len()
            );
        }

        Self::from_parts(manifest, embeddings, passages)
    }

    /// Indices of the `k` nearest embeddings, most similar first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<usize>> {
        if query.len() != self.manifest.dimensions {
            return Err(StudyRootError::Index(format!(
                "Query embedding has {} dimensions, index expects {}",
                query.len(),
                self.manifest.dimensions
            )));
        }

        if let Some(ref map) = self.ann {
            let query_point = EmbeddingPoint {
                values: query.to_vec(),
            };
            let mut search = Search::default();
            return Ok(map
                .search(&query_point, &mut search)
                .take(k)
                .map(|item| *item.value)
                .collect());
        }

        let mut similarities: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| (i, cosine_similarity(query, embedding)))
            .collect();

        similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(similarities.into_iter().take(k).map(|(i, _)| i).collect())
    }

    /// Passage at a position, if any
    pub fn passage(&self, index: usize) -> Option<&Passage> {
        self.passages.get(index)
    }

    pub fn dimensions(&self) -> usize {
        self.manifest.dimensions
    }

    pub fn model(&self) -> Option<&str> {
        self.manifest.model.as_deref()
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Whether the HNSW index has been built
    pub fn has_ann(&self) -> bool {
        self.ann.is_some()
    }
}

fn read_index_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    std::fs::read(&path)
        .map_err(|e| StudyRootError::Index(format!("Cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::vectors::embedding_to_bytes;

    fn manifest(dimensions: usize) -> IndexManifest {
        IndexManifest {
            dimensions,
            model: Some("test-embed".to_string()),
        }
    }

    fn texts(n: usize) -> Vec<Passage> {
        (0..n).map(|i| Passage::Text(format!("passage {}", i))).collect()
    }

    fn write_index(dir: &Path, dims: usize, embeddings: &[Vec<f32>], passages: &str) {
        std::fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string(&manifest(dims)).unwrap(),
        )
        .unwrap();
        let bytes: Vec<u8> = embeddings.iter().flat_map(|e| embedding_to_bytes(e)).collect();
        std::fs::write(dir.join(EMBEDDINGS_FILE), bytes).unwrap();
        std::fs::write(dir.join(PASSAGES_FILE), passages).unwrap();
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = VectorIndex::from_parts(
            manifest(2),
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]],
            texts(3),
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.1], 3).unwrap();
        assert_eq!(hits, vec![1, 2, 0]);

        let top = index.search(&[1.0, 0.1], 1).unwrap();
        assert_eq!(top, vec![1]);
        assert!(!index.has_ann());
    }

    #[test]
    fn test_search_rejects_wrong_dimensions() {
        let index = VectorIndex::from_parts(manifest(2), vec![vec![1.0, 0.0]], texts(1)).unwrap();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 3),
            Err(StudyRootError::Index(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_ragged_embeddings() {
        let result = VectorIndex::from_parts(manifest(2), vec![vec![1.0]], texts(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_ann_index_built_above_threshold() {
        let embeddings: Vec<Vec<f32>> = (0..ANN_THRESHOLD + 10)
            .map(|i| {
                let x = i as f32;
                vec![x.sin(), x.cos(), (x * 0.5).sin(), (x * 0.5).cos()]
            })
            .collect();
        let target = embeddings[42].clone();
        let index =
            VectorIndex::from_parts(manifest(4), embeddings, texts(ANN_THRESHOLD + 10)).unwrap();

        assert!(index.has_ann());
        let hits = index.search(&target, 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], 42);
    }

    #[test]
    fn test_load_from_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        write_index(
            temp.path(),
            3,
            &[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            r#"["first", {"page_content": "second"}]"#,
        );

        let index = VectorIndex::load(temp.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimensions(), 3);
        assert_eq!(index.model(), Some("test-embed"));
        assert_eq!(index.passage(1).unwrap().text(), "second");
        assert!(index.passage(2).is_none());
    }

    #[test]
    fn test_load_rejects_truncated_embeddings() {
        let temp = tempfile::TempDir::new().unwrap();
        write_index(temp.path(), 3, &[vec![1.0, 0.0, 0.0]], r#"["only"]"#);
        let mut bytes = std::fs::read(temp.path().join(EMBEDDINGS_FILE)).unwrap();
        bytes.truncate(8);
        std::fs::write(temp.path().join(EMBEDDINGS_FILE), bytes).unwrap();

        assert!(matches!(
            VectorIndex::load(temp.path()),
            Err(StudyRootError::Index(_))
        ));
    }

    #[test]
    fn test_load_missing_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = VectorIndex::load(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, StudyRootError::Index(_)));
    }
}
