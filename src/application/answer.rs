use crate::domain::entities::answer::Answer;
use crate::domain::entities::document::ScoredDocument;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::generation_port::TextGenerator;
use std::sync::Arc;
use tracing::debug;

pub struct AnswerUseCase {
    repo: Arc<dyn DocumentRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl AnswerUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { repo, generator }
    }

    /// Retrieves the closest passages and asks the generator to answer
    /// `question` from them.
    pub async fn execute(&self, question: &str, limit: usize) -> Result<Answer, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::Validation("Query field is required".into()));
        }
        let retrieved_documents = self.repo.search(question, limit).await?;
        let prompt = build_prompt(question, &retrieved_documents);
        debug!(passages = retrieved_documents.len(), "generating answer");

        let answer = self.generator.generate(&prompt).await?;
        Ok(Answer {
            answer,
            retrieved_documents,
        })
    }
}

pub fn build_prompt(question: &str, passages: &[ScoredDocument]) -> String {
    let mut prompt = String::from("Answer the question using only the context below.\n\n");
    if passages.is_empty() {
        prompt.push_str("Context: (no relevant documents found)\n");
    } else {
        prompt.push_str("Context:\n");
        for (i, passage) in passages.iter().enumerate() {
            prompt.push_str(&format!("[{}] {}\n", i + 1, passage.document.content));
        }
    }
    prompt.push_str(&format!("\nQuestion: {question}\nAnswer:"));
    prompt
}
