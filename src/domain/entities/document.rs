use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key-value mapping carried alongside a document. Key order is preserved.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
        }
    }

    /// Builds a document with a freshly generated id.
    pub fn with_generated_id(content: impl Into<String>, metadata: Metadata) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), content, metadata)
    }
}

/// A retrieved document paired with its distance to the query (lower is closer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: Document,
    pub distance: f32,
}
