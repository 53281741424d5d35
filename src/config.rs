//! Environment-driven settings for the binary and [`crate::RagStore::new`].

use crate::domain::error::DomainError;
use crate::infrastructure::embeddings::hashing::DEFAULT_DIMENSION;
use crate::infrastructure::flatfile::vector_store::StoreConfig;
use std::path::PathBuf;

pub const DEFAULT_INDEX_PATH: &str = "./data/ragstore.index";
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hashing { dimension: usize },
    Ollama,
    OpenAi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationBackend {
    Template,
    Ollama,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub index_path: PathBuf,
    pub records_path: Option<PathBuf>,
    pub normalize: bool,
    pub top_k: usize,
    pub embedding: EmbeddingBackend,
    pub embedding_model: Option<String>,
    pub embedding_api_key: String,
    pub generation: GenerationBackend,
    pub generation_model: Option<String>,
    pub ollama_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let index_path = lookup("RAGSTORE_INDEX_PATH").unwrap_or_else(|| DEFAULT_INDEX_PATH.into());
        let normalize = match lookup("RAGSTORE_NORMALIZE") {
            Some(v) => parse_bool("RAGSTORE_NORMALIZE", &v)?,
            None => true,
        };
        let top_k = match lookup("RAGSTORE_TOP_K") {
            Some(v) => parse_usize("RAGSTORE_TOP_K", &v)?,
            None => DEFAULT_TOP_K,
        };

        let provider = lookup("RAGSTORE_EMBEDDING_PROVIDER").unwrap_or_else(|| "hashing".into());
        let embedding = match provider.to_lowercase().as_str() {
            "hashing" => {
                let dimension = match lookup("RAGSTORE_HASH_DIMENSION") {
                    Some(v) => parse_usize("RAGSTORE_HASH_DIMENSION", &v)?,
                    None => DEFAULT_DIMENSION,
                };
                if dimension == 0 {
                    return Err(DomainError::Validation("RAGSTORE_HASH_DIMENSION must be positive".into()));
                }
                EmbeddingBackend::Hashing { dimension }
            }
            "ollama" => EmbeddingBackend::Ollama,
            "openai" => EmbeddingBackend::OpenAi,
            other => {
                return Err(DomainError::Validation(format!(
                    "Unknown embedding provider: {other}"
                )))
            }
        };

        let generator = lookup("RAGSTORE_GENERATION_PROVIDER").unwrap_or_else(|| "template".into());
        let generation = match generator.to_lowercase().as_str() {
            "template" => GenerationBackend::Template,
            "ollama" => GenerationBackend::Ollama,
            other => {
                return Err(DomainError::Validation(format!(
                    "Unknown generation provider: {other}"
                )))
            }
        };

        Ok(Self {
            index_path: PathBuf::from(index_path),
            records_path: lookup("RAGSTORE_RECORDS_PATH").map(PathBuf::from),
            normalize,
            top_k,
            embedding,
            embedding_model: lookup("RAGSTORE_EMBEDDING_MODEL"),
            embedding_api_key: lookup("RAGSTORE_EMBEDDING_API_KEY").unwrap_or_default(),
            generation,
            generation_model: lookup("RAGSTORE_GENERATION_MODEL"),
            ollama_url: lookup("RAGSTORE_OLLAMA_URL"),
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.index_path).with_normalize(self.normalize);
        match &self.records_path {
            Some(path) => config.with_records_path(path),
            None => config,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DomainError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DomainError::Validation(format!("{key}: expected a boolean, got '{value}'"))),
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::Validation(format!("{key}: expected a non-negative integer, got '{value}'")))
}
