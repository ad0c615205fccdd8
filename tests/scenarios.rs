//! End-to-end scenarios mirroring the concrete walkthroughs: fresh index,
//! incremental no-op, modification, deletion, extension filtering, and
//! preview truncation.

use std::fs;

use quarry::{Engine, EngineConfig, IndexMode, Priority, SearchFilters};
use tokio_util::sync::CancellationToken;

fn config_in(dir: &std::path::Path) -> EngineConfig {
    let mut cfg = EngineConfig::default();
    cfg.db_path = dir.join("idx.sqlite3");
    cfg
}

#[tokio::test]
async fn scenario_fresh_index_then_incremental_noop() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello world").unwrap();
    fs::write(dir.path().join("b.md"), "# Title\n\nhello").unwrap();
    fs::write(dir.path().join("c.bin"), "hello").unwrap();

    let engine = Engine::open(config_in(dir.path())).unwrap();
    let cancel = CancellationToken::new();

    let stats = engine
        .index_root(dir.path(), IndexMode::Full, Priority::Normal, &cancel)
        .await
        .unwrap();
    assert_eq!(stats.indexed, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.removed, 0);

    let results = engine.search("hello", 10, 0, SearchFilters::default()).await.unwrap();
    let mut paths: Vec<_> = results.items.iter().map(|i| i.path.clone()).collect();
    paths.sort();
    assert_eq!(paths, vec![dir.path().join("a.txt"), dir.path().join("b.md")]);

    let noop = engine
        .index_root(dir.path(), IndexMode::Incremental, Priority::Normal, &cancel)
        .await
        .unwrap();
    assert_eq!(noop.indexed, 0);
    assert_eq!(noop.removed, 0);
}

#[tokio::test]
async fn scenario_modification_then_deletion() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.md");
    fs::write(&a, "hello world").unwrap();
    fs::write(&b, "hello again").unwrap();

    let engine = Engine::open(config_in(dir.path())).unwrap();
    let cancel = CancellationToken::new();
    engine.index_root(dir.path(), IndexMode::Full, Priority::Normal, &cancel).await.unwrap();

    let newer = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
    fs::write(&a, "goodbye").unwrap();
    let file = fs::File::options().write(true).open(&a).unwrap();
    file.set_modified(newer).unwrap();

    let modified_stats = engine
        .index_root(dir.path(), IndexMode::Incremental, Priority::Normal, &cancel)
        .await
        .unwrap();
    assert_eq!(modified_stats.indexed, 1);

    let hits = engine.search("hello", 10, 0, SearchFilters::default()).await.unwrap();
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].path, b);

    fs::remove_file(&b).unwrap();
    let deletion_stats = engine
        .index_root(dir.path(), IndexMode::Incremental, Priority::Normal, &cancel)
        .await
        .unwrap();
    assert_eq!(deletion_stats.removed, 1);
}

#[tokio::test]
async fn scenario_extension_filter() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "pipeline notes").unwrap();
    fs::write(dir.path().join("a.py"), "pipeline code").unwrap();

    let engine = Engine::open(config_in(dir.path())).unwrap();
    engine
        .index_root(dir.path(), IndexMode::Full, Priority::Normal, &CancellationToken::new())
        .await
        .unwrap();

    let filters = SearchFilters {
        extensions: vec![".py".into()],
        ..Default::default()
    };
    let results = engine.search("pipeline", 10, 0, filters).await.unwrap();
    assert_eq!(results.items.len(), 1);
    assert_eq!(results.items[0].path, dir.path().join("a.py"));
}

#[tokio::test]
async fn scenario_preview_truncates_large_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let big = "word ".repeat(2000);
    fs::write(dir.path().join("big.txt"), &big).unwrap();

    let engine = Engine::open(config_in(dir.path())).unwrap();
    engine
        .index_root(dir.path(), IndexMode::Full, Priority::Normal, &CancellationToken::new())
        .await
        .unwrap();

    let preview = engine
        .preview(dir.path().join("big.txt"), None, 100, 100)
        .await
        .unwrap();
    assert!(preview.preview.chars().count() <= 200);
}

#[tokio::test]
async fn scenario_phrase_query_requires_adjacency() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "the exact phrase appears here").unwrap();
    fs::write(dir.path().join("b.txt"), "phrase the exact is reordered").unwrap();

    let engine = Engine::open(config_in(dir.path())).unwrap();
    engine
        .index_root(dir.path(), IndexMode::Full, Priority::Normal, &CancellationToken::new())
        .await
        .unwrap();

    let results = engine
        .search(r#""exact phrase""#, 10, 0, SearchFilters::default())
        .await
        .unwrap();
    assert_eq!(results.items.len(), 1);
    assert_eq!(results.items[0].path, dir.path().join("a.txt"));
}
