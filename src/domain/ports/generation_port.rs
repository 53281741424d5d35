use crate::domain::error::DomainError;

/// Turns a prompt containing retrieved passages into prose.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}
