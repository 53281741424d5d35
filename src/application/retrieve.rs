use crate::domain::entities::document::ScoredDocument;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use std::sync::Arc;

pub struct RetrieveUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl RetrieveUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::Validation("Query field is required".into()));
        }
        self.repo.search(query, limit).await
    }
}
