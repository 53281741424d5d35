use crate::domain::entities::document::{Document, Metadata};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use std::sync::Arc;

pub struct IngestUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl IngestUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    /// Stores a document, generating an id when none is given.
    pub async fn execute(
        &self,
        id: Option<String>,
        content: String,
        metadata: Metadata,
    ) -> Result<Document, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Missing required field: content".into()));
        }
        let document = match id.filter(|id| !id.is_empty()) {
            Some(id) => Document::new(id, content, metadata),
            None => Document::with_generated_id(content, metadata),
        };

        self.repo.add(document.clone()).await?;
        Ok(document)
    }
}
