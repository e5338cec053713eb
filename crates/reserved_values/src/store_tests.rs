use super::*;
use std::collections::{HashMap, HashSet};
use text_pattern::{TextPattern, TextPatternMethod, TextPatternService};

fn owner() -> OwnerId {
    OwnerId::new("attr1").unwrap()
}

fn sequential(parameter: &str) -> TextPatternSegment {
    TextPatternSegment::new(TextPatternMethod::Sequential, parameter).unwrap()
}

fn persisted_config(path: &Path) -> StoreConfig {
    StoreConfig {
        persistence_path: Some(path.to_path_buf()),
        ..StoreConfig::default()
    }
}

#[tokio::test]
async fn test_store_hands_out_consecutive_sequence_values() {
    let (store, _task) = ReservedValueStore::spawn(StoreConfig::default()).await.unwrap();
    let segment = sequential("##");

    let first = store
        .generate_and_reserve_values(&owner(), "A-", &segment, 1)
        .await
        .unwrap();
    let next = store
        .generate_and_reserve_values(&owner(), "A-", &segment, 2)
        .await
        .unwrap();

    assert_eq!(first, vec!["01"]);
    assert_eq!(next, vec!["02", "03"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_never_share_a_value() {
    let (store, _task) = ReservedValueStore::spawn(StoreConfig::default()).await.unwrap();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let owner = owner();
                let segment = sequential("###");
                store
                    .generate_and_reserve_values(&owner, "ctx", &segment, 1)
                    .await
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for task in tasks {
        let values = task.await.unwrap().unwrap();
        assert!(seen.insert(values[0].clone()), "duplicate value {}", values[0]);
    }
    assert_eq!(seen.len(), 50);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reserved.json");
    let segment = sequential("###");

    let (store, task) = ReservedValueStore::spawn(persisted_config(&path)).await.unwrap();
    store
        .generate_and_reserve_values(&owner(), "", &segment, 2)
        .await
        .unwrap();
    drop(store);
    task.await.unwrap();

    let (restarted, _task) = ReservedValueStore::spawn(persisted_config(&path)).await.unwrap();
    let next = restarted
        .generate_and_reserve_values(&owner(), "", &segment, 1)
        .await
        .unwrap();

    assert_eq!(next, vec!["003"]);
}

#[tokio::test]
async fn test_failed_write_reports_storage_error_and_keeps_value_available() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("reserved.json");
    let (store, _task) = ReservedValueStore::spawn(persisted_config(&path)).await.unwrap();
    let segment = sequential("#");

    let result = store
        .generate_and_reserve_values(&owner(), "", &segment, 1)
        .await;
    assert!(matches!(result, Err(ReservationError::Storage { .. })));

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let retried = store
        .generate_and_reserve_values(&owner(), "", &segment, 1)
        .await
        .unwrap();
    assert_eq!(retried, vec!["1"]);
}

#[tokio::test]
async fn test_reserved_values_are_on_disk_before_reply() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reserved.json");
    let (store, _task) = ReservedValueStore::spawn(persisted_config(&path)).await.unwrap();

    store
        .generate_and_reserve_values(&owner(), "A-", &sequential("##"), 2)
        .await
        .unwrap();

    let on_disk: ReservationState =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.last_sequence(&owner(), "SEQUENTIAL(##)", "A-"), Some(2));
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_failed_write_only_rolls_back_the_failed_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reserved.json");
    let (store, _task) = ReservedValueStore::spawn(persisted_config(&path)).await.unwrap();
    let segment = sequential("##");

    store
        .generate_and_reserve_values(&owner(), "A-", &segment, 3)
        .await
        .unwrap();

    // A directory in the staging file's place makes the next write fail.
    std::fs::create_dir(path.with_extension("tmp")).unwrap();
    let failed = store
        .generate_and_reserve_values(&owner(), "B-", &segment, 1)
        .await;
    assert!(matches!(failed, Err(ReservationError::Storage { .. })));

    std::fs::remove_dir(path.with_extension("tmp")).unwrap();
    let next_a = store
        .generate_and_reserve_values(&owner(), "A-", &segment, 1)
        .await
        .unwrap();
    let first_b = store
        .generate_and_reserve_values(&owner(), "B-", &segment, 1)
        .await
        .unwrap();

    assert_eq!(next_a, vec!["04"]);
    assert_eq!(first_b, vec!["01"]);
}

#[tokio::test]
async fn test_store_task_finishes_when_handles_are_dropped() {
    let (store, task) = ReservedValueStore::spawn(StoreConfig::default()).await.unwrap();
    let copy = store.clone();

    drop(store);
    drop(copy);

    task.await.unwrap();
}

#[tokio::test]
async fn test_corrupt_state_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reserved.json");
    std::fs::write(&path, "not json").unwrap();

    let result = ReservedValueStore::spawn(persisted_config(&path)).await;

    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}

#[tokio::test]
async fn test_stopped_store_is_unavailable() {
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    let store = ReservedValueStore { sender };

    let result = store
        .generate_and_reserve_values(&owner(), "", &sequential("#"), 1)
        .await;

    assert!(matches!(result, Err(ReservationError::Unavailable { .. })));
}

#[tokio::test]
async fn test_seeded_random_generation_is_reproducible() {
    let config = StoreConfig {
        random_seed: Some(42),
        ..StoreConfig::default()
    };
    let segment = TextPatternSegment::new(TextPatternMethod::Random, "X#X#").unwrap();

    let (a, _task) = ReservedValueStore::spawn(config.clone()).await.unwrap();
    let (b, _task) = ReservedValueStore::spawn(config).await.unwrap();

    let from_a = a.generate_and_reserve_values(&owner(), "", &segment, 3).await.unwrap();
    let from_b = b.generate_and_reserve_values(&owner(), "", &segment, 3).await.unwrap();

    assert_eq!(from_a, from_b);
    assert!(from_a.iter().all(|v| segment.validate_value(v)));
}

#[tokio::test]
async fn test_service_resolves_through_store() {
    let (store, _task) = ReservedValueStore::spawn(StoreConfig::default()).await.unwrap();
    let service = TextPatternService::new(store);
    let pattern: TextPattern = "ORG_UNIT_CODE(...)-SEQUENTIAL(###)".parse().unwrap();
    let pattern = pattern.with_owner(owner());

    let mut oslo = HashMap::new();
    oslo.insert("ORG_UNIT_CODE(...)".to_string(), "OSLO".to_string());
    let mut bergen = HashMap::new();
    bergen.insert("ORG_UNIT_CODE(...)".to_string(), "BERGEN".to_string());

    assert_eq!(service.resolve_pattern(&pattern, &oslo).await.unwrap(), "OSL-001");
    assert_eq!(service.resolve_pattern(&pattern, &oslo).await.unwrap(), "OSL-002");
    assert_eq!(service.resolve_pattern(&pattern, &bergen).await.unwrap(), "BER-001");
}
