//! Shared test helpers.
#![allow(dead_code)]

use ragstore::domain::entities::document::{Document, Metadata};
use ragstore::domain::error::DomainError;
use ragstore::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use ragstore::domain::ports::generation_port::TextGenerator;
use ragstore::infrastructure::embeddings::hashing::HashingEmbedder;
use ragstore::infrastructure::flatfile::vector_store::{StoreConfig, VectorStore};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DIM: usize = 64;

/// Hashing embedder whose dimension and availability can be changed mid-test.
pub struct TestEmbedder {
    dimension: AtomicUsize,
    fail: AtomicBool,
    embedded: AtomicUsize,
}

impl TestEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: AtomicUsize::new(dimension),
            fail: AtomicBool::new(false),
            embedded: AtomicUsize::new(0),
        }
    }

    pub fn set_dimension(&self, dimension: usize) {
        self.dimension.store(dimension, Ordering::SeqCst);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Total number of texts embedded so far, probe included.
    pub fn embedded_texts(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TestEmbedder {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Embedding("embedding service unavailable".into()));
        }
        self.embedded.fetch_add(texts.len(), Ordering::SeqCst);
        let hasher = HashingEmbedder::new(self.dimension.load(Ordering::SeqCst));
        Ok(texts.iter().map(|t| hasher.embed_text(t)).collect())
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Generator that records every prompt and answers with a fixed string.
#[derive(Default)]
pub struct RecordingGenerator {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("generated answer".into())
    }
}

pub fn config(dir: &Path) -> StoreConfig {
    StoreConfig::new(dir.join("store.index"))
}

pub async fn open_store(dir: &Path) -> VectorStore {
    VectorStore::open(config(dir), Arc::new(HashingEmbedder::new(DIM)))
        .await
        .unwrap()
}

pub async fn open_with(dir: &Path, embedder: Arc<TestEmbedder>) -> VectorStore {
    VectorStore::open(config(dir), embedder).await.unwrap()
}

pub fn doc(id: &str, content: &str) -> Document {
    Document::new(id, content, Metadata::new())
}

pub fn ids(results: &[ragstore::domain::entities::document::ScoredDocument]) -> Vec<String> {
    results.iter().map(|r| r.document.id.clone()).collect()
}
