//! File-backed vector store.
//!
//! Owns a [`FlatIndex`] and a [`RecordStore`] that stay positionally aligned:
//! the vector at position `i` was embedded from the content of record `i`.
//! Every mutation is flushed to disk before it returns. Deletion rebuilds the
//! whole index from the surviving records, since the index cannot drop
//! entries in place.

use crate::domain::entities::document::{Document, ScoredDocument};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{DocumentRepository, StoreStats};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::flatfile::index::{l2_normalize, FlatIndex};
use crate::infrastructure::flatfile::persistence::{ArtifactState, PersistenceManager};
use crate::infrastructure::flatfile::records::RecordStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const EMBED_BATCH: usize = 32;
const PROBE_TEXT: &str = "test";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub index_path: PathBuf,
    pub records_path: PathBuf,
    /// L2-normalize stored and query vectors alike.
    pub normalize: bool,
}

impl StoreConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        let index_path = index_path.into();
        Self {
            records_path: default_records_path(&index_path),
            index_path,
            normalize: true,
        }
    }

    pub fn with_records_path(mut self, records_path: impl Into<PathBuf>) -> Self {
        self.records_path = records_path.into();
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// `<index_path>_metadata.json`
pub fn default_records_path(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_os_string();
    name.push("_metadata.json");
    PathBuf::from(name)
}

/// How the store came up at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub records: ArtifactState,
    pub index: ArtifactState,
    /// The index was rebuilt from records because the two disagreed.
    pub rebuilt: bool,
}

struct State {
    index: FlatIndex,
    records: RecordStore,
}

pub struct VectorStore {
    state: RwLock<State>,
    embedder: Arc<dyn EmbeddingProvider>,
    persistence: PersistenceManager,
    normalize: bool,
    dimension: usize,
    load_outcome: LoadOutcome,
}

impl VectorStore {
    /// Opens the store at the configured paths. The vector dimension is taken
    /// from a probe embedding; artifacts that are missing, unreadable, of
    /// another dimension or of the other normalisation setting are replaced
    /// with empty ones, and an index that does not line up with the records is
    /// rebuilt before the store is returned.
    pub async fn open(config: StoreConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self, DomainError> {
        let dimension = probe_dimension(embedder.as_ref()).await?;
        let persistence = PersistenceManager::new(config.index_path, config.records_path, config.normalize);

        let (records, records_state) = persistence.load_records();
        let (index, index_state) = persistence.load_index(dimension);

        let mut store = Self {
            state: RwLock::new(State { index, records }),
            embedder,
            persistence,
            normalize: config.normalize,
            dimension,
            load_outcome: LoadOutcome {
                records: records_state,
                index: index_state,
                rebuilt: false,
            },
        };

        let (vectors, documents) = {
            let state = store.state.get_mut();
            (state.index.size(), state.records.len())
        };
        if vectors != documents {
            warn!(
                vectors,
                records = documents,
                "index and records out of step, rebuilding index from records"
            );
            let state = store.state.read().await;
            let index = store.embed_all(state.records.all()).await?;
            store.persistence.save(&state.records, &index)?;
            drop(state);
            store.state.get_mut().index = index;
            store.load_outcome.rebuilt = true;
        }

        info!(
            documents,
            dimension,
            provider = store.embedder.name(),
            index = %store.persistence.index_path().display(),
            "vector store ready"
        );
        Ok(store)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of vectors currently in the index.
    pub async fn index_size(&self) -> usize {
        self.state.read().await.index.size()
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.records.all().to_vec()
    }

    pub async fn add(&self, document: Document) -> Result<(), DomainError> {
        if document.content.trim().is_empty() {
            return Err(DomainError::Validation("document content is required".into()));
        }
        let vector = self.embed_one(&document.content, InputType::Document).await?;

        let mut state = self.state.write().await;
        let previous = state.records.len();
        state.index.insert(&vector)?;
        state.records.append(document);

        if let Err(e) = self.persistence.save(&state.records, &state.index) {
            state.index.truncate(previous);
            state.records.truncate(previous);
            self.persistence.restore_records(&state.records);
            return Err(e);
        }
        debug!(documents = state.records.len(), "document added");
        Ok(())
    }

    /// Returns up to `k` documents closest to `query`, closest first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::Validation("query text is required".into()));
        }
        let vector = self.embed_one(query, InputType::Query).await?;

        let state = self.state.read().await;
        let hits = state.index.search(&vector, k)?;
        let mut results = Vec::with_capacity(hits.len());
        for (position, distance) in hits {
            match state.records.get(position) {
                Some(document) => results.push(ScoredDocument {
                    document: document.clone(),
                    distance,
                }),
                None => warn!(
                    position,
                    records = state.records.len(),
                    "index returned a position outside the record range, skipping"
                ),
            }
        }
        Ok(results)
    }

    /// Removes every document whose id is `id` and rebuilds the index from
    /// the survivors. Persists even when nothing matched.
    pub async fn delete(&self, id: &str) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;

        let mut survivors = state.records.clone();
        let removed = survivors.remove_where(|r| r.id == id);
        if removed == 0 {
            self.persistence.save(&state.records, &state.index)?;
            debug!(id, "delete matched no documents");
            return Ok(0);
        }

        let index = self.embed_all(survivors.all()).await?;
        if let Err(e) = self.persistence.save(&survivors, &index) {
            self.persistence.restore_records(&state.records);
            return Err(e);
        }
        state.records = survivors;
        state.index = index;

        info!(id, removed, remaining = state.records.len(), "documents deleted, index rebuilt");
        Ok(removed)
    }

    /// Re-embeds every record into a fresh index and persists it.
    pub async fn rebuild(&self) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        let index = self.embed_all(state.records.all()).await?;
        self.persistence.save(&state.records, &index)?;
        state.index = index;

        let count = state.records.len();
        info!(documents = count, "index rebuilt from records");
        Ok(count)
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            documents: state.records.len(),
            dimension: self.dimension,
            normalize: self.normalize,
            index_path: self.persistence.index_path().to_path_buf(),
            records_path: self.persistence.records_path().to_path_buf(),
        }
    }

    async fn embed_one(&self, text: &str, input_type: InputType) -> Result<Vec<f32>, DomainError> {
        let vector = self
            .embedder
            .embed(&[text.to_string()], input_type)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("provider returned no vectors".into()))?;
        self.prepare(vector)
    }

    /// Embeds `documents` in order into a new index. Touches no store state,
    /// so a failure leaves the current index in place.
    async fn embed_all(&self, documents: &[Document]) -> Result<FlatIndex, DomainError> {
        let mut index = FlatIndex::new(self.dimension);
        for chunk in documents.chunks(EMBED_BATCH) {
            let texts: Vec<String> = chunk.iter().map(|d| d.content.clone()).collect();
            let vectors = self.embedder.embed(&texts, InputType::Document).await?;
            if vectors.len() != texts.len() {
                return Err(DomainError::Embedding(format!(
                    "provider returned {} vectors for {} texts",
                    vectors.len(),
                    texts.len()
                )));
            }
            for vector in vectors {
                index.insert(&self.prepare(vector)?)?;
            }
        }
        Ok(index)
    }

    fn prepare(&self, vector: Vec<f32>) -> Result<Vec<f32>, DomainError> {
        if vector.len() != self.dimension {
            return Err(DomainError::Dimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if self.normalize {
            Ok(l2_normalize(&vector))
        } else {
            Ok(vector)
        }
    }
}

async fn probe_dimension(embedder: &dyn EmbeddingProvider) -> Result<usize, DomainError> {
    let probe = embedder
        .embed(&[PROBE_TEXT.to_string()], InputType::Document)
        .await?;
    let dimension = probe.first().map(Vec::len).unwrap_or(0);
    if dimension == 0 {
        return Err(DomainError::Dimension {
            expected: 1,
            actual: 0,
        });
    }
    Ok(dimension)
}

#[async_trait::async_trait]
impl DocumentRepository for VectorStore {
    async fn add(&self, document: Document) -> Result<(), DomainError> {
        VectorStore::add(self, document).await
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        VectorStore::search(self, query, k).await
    }

    async fn delete(&self, id: &str) -> Result<usize, DomainError> {
        VectorStore::delete(self, id).await
    }

    async fn rebuild(&self) -> Result<usize, DomainError> {
        VectorStore::rebuild(self).await
    }

    async fn stats(&self) -> Result<StoreStats, DomainError> {
        Ok(VectorStore::stats(self).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::document::Metadata;
    use crate::infrastructure::embeddings::hashing::HashingEmbedder;

    #[tokio::test]
    async fn test_search_skips_positions_without_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VectorStore::open(
            StoreConfig::new(dir.path().join("store.index")),
            Arc::new(HashingEmbedder::new(32)),
        )
        .await
        .unwrap();
        store.add(Document::new("a", "first document", Metadata::new())).await.unwrap();
        store.add(Document::new("b", "second document", Metadata::new())).await.unwrap();

        // A vector with no record behind it, placed where the query will hit it first.
        let orphan = store.embed_one("orphan", InputType::Query).await.unwrap();
        store.state.get_mut().index.insert(&orphan).unwrap();
        assert_eq!(store.index_size().await, 3);

        let results = store.search("orphan", 10).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(results.len(), 2);
        assert!(ids.contains(&"a") && ids.contains(&"b"));
    }
}
