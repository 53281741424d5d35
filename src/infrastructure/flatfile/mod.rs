pub mod index;
pub mod persistence;
pub mod records;
pub mod vector_store;
