use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

impl DomainError {
    /// True for failures raised by an external collaborator (embedding or
    /// generation service). Callers may retry these at a higher level.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, DomainError::Embedding(_) | DomainError::Generation(_))
    }
}
