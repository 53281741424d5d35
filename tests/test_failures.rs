mod common;

use common::{config, doc, ids, open_with, TestEmbedder, DIM};
use ragstore::domain::error::DomainError;
use ragstore::infrastructure::flatfile::vector_store::VectorStore;
use std::sync::Arc;

#[tokio::test]
async fn test_zero_dimension_probe_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = VectorStore::open(config(dir.path()), Arc::new(TestEmbedder::new(0))).await;
    assert!(matches!(result, Err(DomainError::Dimension { actual: 0, .. })));
}

#[tokio::test]
async fn test_unavailable_provider_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TestEmbedder::new(DIM));
    embedder.set_failing(true);
    let err = VectorStore::open(config(dir.path()), embedder).await.err().unwrap();
    assert!(err.is_collaborator());
}

#[tokio::test]
async fn test_embedding_failure_on_add_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TestEmbedder::new(DIM));
    let store = open_with(dir.path(), embedder.clone()).await;
    store.add(doc("1", "first")).await.unwrap();

    embedder.set_failing(true);
    let err = store.add(doc("2", "second")).await.unwrap_err();
    assert!(matches!(err, DomainError::Embedding(_)));
    assert_eq!(store.len().await, 1);
    assert_eq!(store.index_size().await, 1);
}

#[tokio::test]
async fn test_dimension_drift_on_add_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TestEmbedder::new(DIM));
    let store = open_with(dir.path(), embedder.clone()).await;
    store.add(doc("1", "first")).await.unwrap();

    embedder.set_dimension(DIM * 2);
    let err = store.add(doc("2", "second")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Dimension { expected, actual } if expected == DIM && actual == DIM * 2
    ));
    assert_eq!(store.len().await, 1);
    assert_eq!(store.index_size().await, 1);

    let err = store.search("first", 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Dimension { .. }));
}

#[tokio::test]
async fn test_embedding_failure_during_rebuild_keeps_documents() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TestEmbedder::new(DIM));
    let store = open_with(dir.path(), embedder.clone()).await;
    store.add(doc("1", "AI content")).await.unwrap();
    store.add(doc("2", "Machine learning content")).await.unwrap();
    store.add(doc("3", "cooking")).await.unwrap();

    embedder.set_failing(true);
    assert!(store.delete("2").await.is_err());
    assert!(store.rebuild().await.is_err());
    assert_eq!(store.len().await, 3);
    assert_eq!(store.index_size().await, 3);

    embedder.set_failing(false);
    let results = store.search("Machine learning content", 1).await.unwrap();
    assert_eq!(ids(&results), vec!["2"]);

    // artifacts on disk were not touched by the failed delete
    drop(store);
    let reopened = open_with(dir.path(), Arc::new(TestEmbedder::new(DIM))).await;
    assert_eq!(reopened.len().await, 3);
    assert!(!reopened.load_outcome().rebuilt);
}

#[tokio::test]
async fn test_persistence_failure_rolls_back_add() {
    let dir = tempfile::tempdir().unwrap();
    // The index path is an existing directory, so renaming over it fails.
    let index_path = dir.path().join("blocked");
    std::fs::create_dir(&index_path).unwrap();
    std::fs::write(index_path.join("keep"), b"x").unwrap();

    let store = VectorStore::open(
        ragstore::infrastructure::flatfile::vector_store::StoreConfig::new(&index_path),
        Arc::new(TestEmbedder::new(DIM)),
    )
    .await
    .unwrap();

    let err = store.add(doc("1", "never stored")).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
    assert!(store.is_empty().await);
    assert_eq!(store.index_size().await, 0);
    drop(store);

    // The rejected document must not come back once the path is usable again.
    std::fs::remove_dir_all(&index_path).unwrap();
    let reopened = VectorStore::open(
        ragstore::infrastructure::flatfile::vector_store::StoreConfig::new(&index_path),
        Arc::new(TestEmbedder::new(DIM)),
    )
    .await
    .unwrap();
    assert!(reopened.is_empty().await);
    assert_eq!(reopened.index_size().await, 0);
}

#[tokio::test]
async fn test_failed_delete_does_not_apply_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(TestEmbedder::new(DIM));
    let store = open_with(dir.path(), embedder.clone()).await;
    store.add(doc("1", "AI content")).await.unwrap();
    store.add(doc("2", "Machine learning content")).await.unwrap();

    let index_path = dir.path().join("store.index");
    std::fs::remove_file(&index_path).unwrap();
    std::fs::create_dir(&index_path).unwrap();
    std::fs::write(index_path.join("keep"), b"x").unwrap();

    let err = store.delete("1").await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
    assert_eq!(store.len().await, 2);
    drop(store);

    std::fs::remove_dir_all(&index_path).unwrap();
    let reopened = open_with(dir.path(), embedder).await;
    assert_eq!(reopened.len().await, 2);
    let results = reopened.search("AI content", 1).await.unwrap();
    assert_eq!(ids(&results), vec!["1"]);
}
