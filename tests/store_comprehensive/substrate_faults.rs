//! Substrate failures and stream policies surfacing through the engines

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, ResponseCode, StoreConfig};
use subjectstore_substrate::{DiscardPolicy, MemoryKv, MemoryLog};

#[tokio::test]
async fn lost_log_connection_maps_to_connection_refused() {
    let t = TestStore::new();
    t.store.models().create("Orders", 2).await.unwrap();
    t.log.set_online(false);

    let err = t
        .store
        .rows()
        .find("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::ConnectionRefused);

    t.log.set_online(true);
    let err = t
        .store
        .rows()
        .find("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::NoMessageFound);
}

#[tokio::test]
async fn lost_kv_connection_maps_to_connection_refused() {
    let t = TestStore::new();
    t.kv.set_online(false);
    let err = t
        .store
        .sections()
        .upsert("cfg", Bytes::from_static(b"v1"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::ConnectionRefused);
}

#[tokio::test]
async fn oversized_names_and_payloads_are_rejected() {
    let t = TestStore::with_substrates(
        MemoryLog::with_max_payload(32),
        MemoryKv::with_max_payload(4),
        StoreConfig::default(),
    );
    let err = t
        .store
        .models()
        .create("AVeryLongModelNameForTinyLimits", 3)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::PayloadTooLarge);

    t.store.models().create("Orders", 1).await.unwrap();
    let err = t
        .store
        .rows()
        .insert("Orders", Bytes::from(vec![0u8; 64]), &indexes(["1"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::PayloadTooLarge);

    let err = t
        .store
        .sections()
        .upsert("cfg", Bytes::from_static(b"too long"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::PayloadTooLarge);
}

#[tokio::test]
async fn deny_delete_surfaces_as_row_not_deleted() {
    let mut config = StoreConfig::default();
    config.model.deny_delete = true;
    let store = TestStore::with_config(config).store;
    store.models().create("Audit", 1).await.unwrap();
    store
        .rows()
        .insert("Audit", Bytes::from_static(b"e1"), &indexes(["1"]))
        .await
        .unwrap();

    let err = store
        .rows()
        .delete("Audit", &indexes(["1"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotDeleted);
    assert!(store.rows().find("Audit", &indexes(["1"])).await.is_ok());
}

#[tokio::test]
async fn unmapped_substrate_codes_are_unclassified() {
    let mut config = StoreConfig::default();
    config.model.discard = DiscardPolicy::New;
    config.model.max_msgs = 1;
    let store = TestStore::with_config(config).store;
    store.models().create("Queue", 1).await.unwrap();
    store
        .rows()
        .insert("Queue", Bytes::from_static(b"a"), &indexes(["1"]))
        .await
        .unwrap();

    let err = store
        .rows()
        .insert("Queue", Bytes::from_static(b"b"), &indexes(["2"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::Unclassified);
    assert!(err.to_string().contains("maximum messages exceeded"));
}
