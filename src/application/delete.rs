use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use std::sync::Arc;

pub struct DeleteUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl DeleteUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    /// Removes every document with `id`. Returns how many were removed.
    pub async fn execute(&self, id: &str) -> Result<usize, DomainError> {
        if id.is_empty() {
            return Err(DomainError::Validation("Missing required field: id".into()));
        }
        self.repo.delete(id).await
    }
}
