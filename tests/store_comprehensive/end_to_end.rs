//! Full scenarios through the store facade

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, Operation, ResponseCode};

#[tokio::test]
async fn orders_row_lifecycle() {
    let store = create_store();
    store.models().create("Orders", 2).await.unwrap();

    store
        .rows()
        .insert("Orders", Bytes::from_static(b"P1"), &indexes(["7", "PAID"]))
        .await
        .unwrap();

    let row = store
        .rows()
        .find("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap();
    assert_eq!(row.payload, Bytes::from_static(b"P1"));
    assert_eq!(row.position, 1);

    store
        .rows()
        .delete("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap();

    let err = store
        .rows()
        .find("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), ResponseCode::NoMessageFound);
}

#[tokio::test]
async fn cfg_section_lifecycle() {
    let store = create_store();
    let sections = store.sections();

    let first = sections.upsert("cfg", Bytes::from_static(b"B1")).await.unwrap();
    assert_eq!(first.revision, 1);
    let second = sections.upsert("cfg", Bytes::from_static(b"B2")).await.unwrap();
    assert_eq!(second.revision, 2);

    assert_eq!(
        sections.get_by_version("cfg", 1).await.unwrap().payload,
        Bytes::from_static(b"B1")
    );
    assert_eq!(
        sections.get_working("cfg").await.unwrap().payload,
        Bytes::from_static(b"B2")
    );

    sections.delete("cfg").await.unwrap();
    let err = sections.get_working("cfg").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyNotFound);

    let history = sections.history("cfg").await.unwrap();
    let ops: Vec<Operation> = history.iter().map(|e| e.operation).collect();
    assert_eq!(ops, vec![Operation::Put, Operation::Put, Operation::Delete]);
    assert_eq!(history[0].payload, Bytes::from_static(b"B1"));
    assert_eq!(history[1].payload, Bytes::from_static(b"B2"));
}

#[tokio::test]
async fn concurrent_inserts_on_distinct_rows() {
    let store = store_with_orders().await;
    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .rows()
                .insert("Orders", Bytes::from(format!("p{i}")), &indexes([i.to_string(), "NEW".to_string()]))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let subjects = store.rows().enumerate("Orders", &[]).await.unwrap();
    assert_eq!(subjects.len(), 16);
    let last = store.models().last_row("Orders").await.unwrap();
    assert_eq!(last.position, 16);
}
