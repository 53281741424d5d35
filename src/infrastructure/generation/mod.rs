pub mod ollama;
pub mod template;
