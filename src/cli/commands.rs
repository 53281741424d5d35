use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ragstore", about = "Persistent document vector store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a document
    Ingest {
        /// Text content to embed and store
        content: String,
        /// Document id (a UUID is generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// JSON object with arbitrary metadata
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Retrieve the documents closest to a query
    Retrieve {
        query: String,
        /// Number of results (defaults to RAGSTORE_TOP_K)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete every document with the given id
    Delete { id: String },
    /// Answer a question from retrieved documents
    Answer {
        question: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Re-embed all documents and rewrite the index
    Rebuild,
    /// Show store statistics
    Stats,
}
