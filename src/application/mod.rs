pub mod answer;
pub mod delete;
pub mod ingest;
pub mod rebuild;
pub mod retrieve;
pub mod stats;
