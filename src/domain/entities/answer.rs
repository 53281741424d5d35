use crate::domain::entities::document::ScoredDocument;
use serde::Serialize;

/// Generated prose answer together with the passages it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub retrieved_documents: Vec<ScoredDocument>,
}
