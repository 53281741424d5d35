pub mod document_repository;
pub mod embedding_port;
pub mod generation_port;
