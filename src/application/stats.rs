use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{DocumentRepository, StoreStats};
use std::sync::Arc;

pub struct StatsUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl StatsUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub async fn stats(&self) -> Result<StoreStats, DomainError> {
        self.repo.stats().await
    }
}
