use crate::domain::entities::document::{Document, ScoredDocument};
use crate::domain::error::DomainError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub documents: usize,
    pub dimension: usize,
    pub normalize: bool,
    pub index_path: PathBuf,
    pub records_path: PathBuf,
}

/// Durable document collection searchable by text similarity.
///
/// Every mutation is persisted before it returns. `delete` removes every
/// document carrying the id; ids are not required to be unique.
#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn add(&self, document: Document) -> Result<(), DomainError>;
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, DomainError>;
    async fn delete(&self, id: &str) -> Result<usize, DomainError>;
    /// Re-embeds every stored document and rewrites the index. Returns the document count.
    async fn rebuild(&self) -> Result<usize, DomainError>;
    async fn stats(&self) -> Result<StoreStats, DomainError>;
}
