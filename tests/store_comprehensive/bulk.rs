//! Bulk read tests

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, ResponseCode};

#[tokio::test]
async fn bulk_read_spans_models() {
    let store = store_with_orders().await;
    store.models().create("Users", 1).await.unwrap();
    store
        .rows()
        .insert("Orders", Bytes::from_static(b"o"), &indexes(["7", "PAID"]))
        .await
        .unwrap();
    store
        .rows()
        .insert("Users", Bytes::from_static(b"u"), &indexes(["42"]))
        .await
        .unwrap();

    let read = store
        .bulk()
        .read_many(&["Orders.7.PAID", "Users.42", "Users.43", "Ghosts.1", "Orders.7"])
        .await
        .unwrap();
    assert_eq!(read.len(), 5);

    let found: Vec<&str> = read.found.iter().map(|f| f.address.as_str()).collect();
    assert_eq!(found, vec!["Orders.7.PAID", "Users.42"]);
    assert_eq!(read.found[1].payload, Bytes::from_static(b"u"));

    let codes: Vec<ResponseCode> = read.missing.iter().map(|m| m.code).collect();
    assert_eq!(
        codes,
        vec![
            ResponseCode::NoMessageFound,
            ResponseCode::ModelNotFound,
            ResponseCode::CardinalityMismatch,
        ]
    );
}

#[tokio::test]
async fn bulk_read_rejects_empty_list() {
    let store = create_store();
    let err = store.bulk().read_many::<&str>(&[]).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::EmptyAddressList);
}
