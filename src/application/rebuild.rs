use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use std::sync::Arc;

pub struct RebuildUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl RebuildUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<usize, DomainError> {
        self.repo.rebuild().await
    }
}
