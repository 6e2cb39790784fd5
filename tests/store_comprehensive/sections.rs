//! Section tests

use crate::common::*;
use bytes::Bytes;
use subjectstore::{Operation, ResponseCode, StoreConfig};

#[tokio::test]
async fn nth_revision_returns_nth_payload() {
    let store = create_store();
    let sections = store.sections();
    for i in 1..=4u64 {
        let entry = sections
            .upsert("cfg", Bytes::from(format!("v{i}")))
            .await
            .unwrap();
        assert_eq!(entry.revision, i);
    }
    for i in 1..=4u64 {
        let entry = sections.get_by_version("cfg", i).await.unwrap();
        assert_eq!(entry.payload, Bytes::from(format!("v{i}")));
    }

    let err = sections.get_by_version("cfg", 5).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);
    let err = sections.get_by_version("cfg", 0).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::InvalidVersion);
}

#[tokio::test]
async fn revisions_are_per_key() {
    let store = create_store();
    let sections = store.sections();
    sections.upsert("a", Bytes::from_static(b"1")).await.unwrap();
    sections.upsert("a", Bytes::from_static(b"2")).await.unwrap();
    let b = sections.upsert("b", Bytes::from_static(b"1")).await.unwrap();
    assert_eq!(b.revision, 1);
}

#[tokio::test]
async fn current_view_includes_markers() {
    let store = create_store();
    let sections = store.sections();
    sections.upsert("cfg", Bytes::from_static(b"v1")).await.unwrap();
    sections.delete("cfg").await.unwrap();

    let current = sections.get("cfg").await.unwrap();
    assert_eq!(current.operation, Operation::Delete);
    assert!(!current.is_put());
    let err = sections.get_working("cfg").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);

    // Deleting twice is reported as missing
    let err = sections.delete("cfg").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);
}

#[tokio::test]
async fn upsert_after_delete_revives_section() {
    let store = create_store();
    let sections = store.sections();
    sections.upsert("cfg", Bytes::from_static(b"v1")).await.unwrap();
    sections.delete("cfg").await.unwrap();
    let entry = sections.upsert("cfg", Bytes::from_static(b"v2")).await.unwrap();
    assert_eq!(entry.revision, 3);
    assert_eq!(
        sections.get_working("cfg").await.unwrap().payload,
        Bytes::from_static(b"v2")
    );
}

#[tokio::test]
async fn force_delete_drops_history() {
    let store = create_store();
    let sections = store.sections();
    sections.upsert("cfg", Bytes::from_static(b"v1")).await.unwrap();
    sections.upsert("cfg", Bytes::from_static(b"v2")).await.unwrap();
    sections.force_delete("cfg").await.unwrap();

    let history = sections.history("cfg").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].operation, Operation::Purge);
    let err = sections.get_by_version("cfg", 1).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);

    let err = sections.force_delete("cfg").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);
}

#[tokio::test]
async fn listings_skip_dead_sections() {
    let store = create_store();
    let sections = store.sections();
    let err = sections.list_keys().await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);

    sections.upsert("b", Bytes::from_static(b"2")).await.unwrap();
    sections.upsert("a", Bytes::from_static(b"1")).await.unwrap();
    sections.upsert("gone", Bytes::from_static(b"x")).await.unwrap();
    sections.delete("gone").await.unwrap();

    assert_eq!(sections.list_keys().await.unwrap(), vec!["a", "b"]);
    let pairs = sections.list_key_values().await.unwrap();
    let keys: Vec<&str> = pairs.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(pairs[1].payload, Bytes::from_static(b"2"));
}

#[tokio::test]
async fn destroy_starts_a_fresh_namespace() {
    let store = create_store();
    let sections = store.sections();
    sections.upsert("cfg", Bytes::from_static(b"v1")).await.unwrap();
    sections.destroy().await.unwrap();

    let err = sections.get("cfg").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);
    let entry = sections.upsert("cfg", Bytes::from_static(b"v2")).await.unwrap();
    assert_eq!(entry.revision, 1);
}

#[tokio::test]
async fn bounded_history_forgets_oldest_revisions() {
    let mut config = StoreConfig::default();
    config.sections.max_history = 2;
    let store = TestStore::with_config(config).store;
    let sections = store.sections();
    for payload in [&b"v1"[..], b"v2", b"v3"] {
        sections
            .upsert("cfg", Bytes::copy_from_slice(payload))
            .await
            .unwrap();
    }

    let revisions: Vec<u64> = sections
        .history("cfg")
        .await
        .unwrap()
        .iter()
        .map(|e| e.revision)
        .collect();
    assert_eq!(revisions, vec![2, 3]);
    let err = sections.get_by_version("cfg", 1).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);
}

#[tokio::test]
async fn invalid_keys_are_rejected() {
    let store = create_store();
    for key in ["", "a.b", "k*"] {
        let err = store
            .sections()
            .upsert(key, Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ResponseCode::InvalidSectionKey, "key {:?}", key);
    }
}
