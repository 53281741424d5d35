pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::answer::AnswerUseCase;
use crate::application::delete::DeleteUseCase;
use crate::application::ingest::IngestUseCase;
use crate::application::rebuild::RebuildUseCase;
use crate::application::retrieve::RetrieveUseCase;
use crate::application::stats::StatsUseCase;
use crate::config::{EmbeddingBackend, GenerationBackend, Settings};
use crate::domain::entities::answer::Answer;
use crate::domain::entities::document::{Document, Metadata, ScoredDocument};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{DocumentRepository, StoreStats};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::generation_port::TextGenerator;
use crate::infrastructure::embeddings::hashing::HashingEmbedder;
use crate::infrastructure::embeddings::ollama::OllamaEmbedder;
use crate::infrastructure::embeddings::openai::OpenAiEmbedder;
use crate::infrastructure::flatfile::vector_store::{StoreConfig, VectorStore};
use crate::infrastructure::generation::ollama::OllamaGenerator;
use crate::infrastructure::generation::template::TemplateGenerator;
use std::sync::Arc;

pub struct RagStore {
    ingest_uc: IngestUseCase,
    retrieve_uc: RetrieveUseCase,
    delete_uc: DeleteUseCase,
    answer_uc: AnswerUseCase,
    rebuild_uc: RebuildUseCase,
    stats_uc: StatsUseCase,
}

impl RagStore {
    pub async fn new(settings: &Settings) -> Result<Self, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match settings.embedding {
            EmbeddingBackend::Hashing { dimension } => Arc::new(HashingEmbedder::new(dimension)),
            EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
                settings.ollama_url.clone(),
                settings.embedding_model.clone(),
            )),
            EmbeddingBackend::OpenAi => Arc::new(OpenAiEmbedder::new(
                settings.embedding_api_key.clone(),
                settings.embedding_model.clone(),
            )),
        };

        let generator: Arc<dyn TextGenerator> = match settings.generation {
            GenerationBackend::Template => Arc::new(TemplateGenerator),
            GenerationBackend::Ollama => Arc::new(OllamaGenerator::new(
                settings.ollama_url.clone(),
                settings.generation_model.clone(),
            )),
        };

        Self::with_providers(settings.store_config(), embedder, generator).await
    }

    pub async fn with_providers(
        config: StoreConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, DomainError> {
        let store = VectorStore::open(config, embedder).await?;
        Ok(Self::with_repository(Arc::new(store), generator))
    }

    pub fn with_repository(repo: Arc<dyn DocumentRepository>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            ingest_uc: IngestUseCase::new(repo.clone()),
            retrieve_uc: RetrieveUseCase::new(repo.clone()),
            delete_uc: DeleteUseCase::new(repo.clone()),
            answer_uc: AnswerUseCase::new(repo.clone(), generator),
            rebuild_uc: RebuildUseCase::new(repo.clone()),
            stats_uc: StatsUseCase::new(repo),
        }
    }

    // Delegating methods
    pub async fn ingest(
        &self,
        id: Option<String>,
        content: String,
        metadata: Metadata,
    ) -> Result<Document, DomainError> {
        self.ingest_uc.execute(id, content, metadata).await
    }

    pub async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        self.retrieve_uc.execute(query, limit).await
    }

    pub async fn delete(&self, id: &str) -> Result<usize, DomainError> {
        self.delete_uc.execute(id).await
    }

    pub async fn answer(&self, question: &str, limit: usize) -> Result<Answer, DomainError> {
        self.answer_uc.execute(question, limit).await
    }

    pub async fn rebuild(&self) -> Result<usize, DomainError> {
        self.rebuild_uc.execute().await
    }

    pub async fn stats(&self) -> Result<StoreStats, DomainError> {
        self.stats_uc.stats().await
    }
}
