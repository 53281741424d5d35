use crate::domain::error::DomainError;
use crate::domain::ports::generation_port::TextGenerator;

/// Offline generator that echoes the prompt back. Useful when no model
/// server is available.
pub struct TemplateGenerator;

#[async_trait::async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        Ok(format!("Response for query: {prompt}"))
    }
}
