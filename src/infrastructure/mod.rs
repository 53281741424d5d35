pub mod embeddings;
pub mod flatfile;
pub mod generation;
