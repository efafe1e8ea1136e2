use std::sync::Arc;

use seatwatch::JsonFileStore;
use seatwatch::RegistryStore;
use seatwatch::Submission;
use tempfile::tempdir;

use crate::common::snapshot;
use crate::common::start_engine;
use crate::common::test_config;
use crate::common::FetchStep;

fn quiet() -> FetchStep {
    FetchStep::Snapshot(snapshot(&[("A100", 0), ("B200", 0)]))
}

#[tokio::test(start_paused = true)]
async fn test_restart_spawns_one_poller_per_persisted_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let first = start_engine(test_config(), Arc::new(JsonFileStore::new(&path)), quiet());
    for (key, email) in [
        ("A100", "first@example.com"),
        ("B200", "bee@example.com"),
        ("A100", "second@example.com"),
    ] {
        first
            .engine
            .submit(Submission::new("Sub", email, "555-0101", key))
            .await
            .unwrap();
    }
    first.engine.shutdown().await;

    let restored = start_engine(test_config(), Arc::new(JsonFileStore::new(&path)), quiet());
    let status = restored.engine.status();
    assert_eq!(status.watches.len(), 3);
    assert_eq!(status.active_keys, vec!["A100".to_string(), "B200".to_string()]);
    assert_eq!(restored.engine.start(), 0, "start already restored every key");

    restored
        .fetcher
        .set(FetchStep::Snapshot(snapshot(&[("A100", 1), ("B200", 0)])));
    tokio::time::sleep(crate::common::intervals(1)).await;

    let sent = restored.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "first@example.com");
    assert_eq!(restored.engine.status().active_keys, vec!["B200".to_string()]);

    let persisted = JsonFileStore::new(&path).load();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].key, "B200");
}

#[tokio::test]
async fn test_corrupt_registry_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let ctx = start_engine(test_config(), Arc::new(JsonFileStore::new(&path)), quiet());

    assert!(ctx.engine.status().watches.is_empty());
    assert_eq!(ctx.engine.health().active_pollers, 0);
}

#[tokio::test]
async fn test_missing_registry_starts_empty() {
    let dir = tempdir().unwrap();

    let ctx = start_engine(
        test_config(),
        Arc::new(JsonFileStore::new(dir.path().join("absent.json"))),
        quiet(),
    );

    assert!(ctx.engine.status().watches.is_empty());
}
