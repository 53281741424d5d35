use crate::domain::error::DomainError;
use crate::domain::ports::generation_port::TextGenerator;
use crate::infrastructure::embeddings::ollama::DEFAULT_OLLAMA_URL;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: model.unwrap_or_else(|| "llama3.2".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| DomainError::Generation(format!("Ollama API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Generation(format!("Ollama API {status}: {body}")));
        }

        let result: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Generation(format!("Parse error: {e}")))?;
        Ok(result.response)
    }
}
