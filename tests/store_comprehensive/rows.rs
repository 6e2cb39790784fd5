//! Row operation tests

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, IndexValue, ResponseCode};

#[tokio::test]
async fn find_after_insert_has_stable_position() {
    let store = store_with_orders().await;
    let rows = store.rows();
    rows.insert("Orders", Bytes::from_static(b"P1"), &indexes(["7", "PAID"]))
        .await
        .unwrap();

    let first = rows.find("Orders", &indexes(["7", "PAID"])).await.unwrap();
    let second = rows.find("Orders", &indexes(["7", "PAID"])).await.unwrap();
    assert_eq!(first.payload, Bytes::from_static(b"P1"));
    assert_eq!(first.position, 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn insert_on_existing_address_fails() {
    let store = store_with_orders().await;
    let rows = store.rows();
    rows.insert("Orders", Bytes::from_static(b"P1"), &indexes(["7", "PAID"]))
        .await
        .unwrap();
    let err = rows
        .insert("Orders", Bytes::from_static(b"P2"), &indexes(["7", "PAID"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::KeyExists);
}

#[tokio::test]
async fn insert_after_delete_succeeds() {
    let store = store_with_orders().await;
    let rows = store.rows();
    let idx = indexes(["7", "PAID"]);
    rows.insert("Orders", Bytes::from_static(b"P1"), &idx).await.unwrap();
    rows.delete("Orders", &idx).await.unwrap();
    rows.insert("Orders", Bytes::from_static(b"P2"), &idx).await.unwrap();

    let row = rows.find("Orders", &idx).await.unwrap();
    assert_eq!(row.payload, Bytes::from_static(b"P2"));
    assert_eq!(row.position, 2);
}

#[tokio::test]
async fn delete_missing_row_reports_no_message() {
    let store = store_with_orders().await;
    let err = store
        .rows()
        .delete("Orders", &indexes(["1", "NEW"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::NoMessageFound);
}

#[tokio::test]
async fn update_rewrites_payload() {
    let store = store_with_orders().await;
    let rows = store.rows();
    let idx = indexes(["7", "PAID"]);
    rows.insert("Orders", Bytes::from_static(b"old"), &idx).await.unwrap();
    rows.update("Orders", Bytes::from_static(b"new"), &idx).await.unwrap();
    assert_eq!(
        rows.find("Orders", &idx).await.unwrap().payload,
        Bytes::from_static(b"new")
    );

    let err = rows
        .update("Orders", Bytes::from_static(b"x"), &indexes(["8", "NEW"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::NoMessageFound);
}

#[tokio::test]
async fn wildcard_writes_are_rejected() {
    let store = store_with_orders().await;
    let err = store
        .rows()
        .insert(
            "Orders",
            Bytes::from_static(b"x"),
            &[IndexValue::from("7"), IndexValue::Wildcard],
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);
}

#[tokio::test]
async fn cardinality_mismatch_is_reported() {
    let store = store_with_orders().await;
    let rows = store.rows();
    for idx in [indexes(["7"]), indexes(["7", "PAID", "extra"])] {
        let err = rows.find("Orders", &idx).await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::CardinalityMismatch);
    }
}

#[tokio::test]
async fn index_values_are_scrubbed() {
    let store = store_with_orders().await;
    let rows = store.rows();
    rows.insert("Orders", Bytes::from_static(b"x"), &indexes(["a.b", "c d"]))
        .await
        .unwrap();

    let row = rows.find("Orders", &indexes(["a.b", "c d"])).await.unwrap();
    assert_eq!(row.subject, "Orders.a@b.c@d");
    let row = rows.find("Orders", &indexes(["a@b", "c@d"])).await.unwrap();
    assert_eq!(row.position, 1);
}

#[tokio::test]
async fn enumerate_with_wildcard_returns_matches_in_insertion_order() {
    let store = store_with_orders().await;
    let rows = store.rows();
    for (id, status) in [("3", "PAID"), ("1", "NEW"), ("2", "PAID"), ("4", "NEW")] {
        rows.insert("Orders", Bytes::from_static(b"x"), &indexes([id, status]))
            .await
            .unwrap();
    }

    let paid = rows
        .enumerate("Orders", &[IndexValue::Wildcard, IndexValue::from("PAID")])
        .await
        .unwrap();
    assert_eq!(paid, vec!["Orders.3.PAID", "Orders.2.PAID"]);

    let all = rows.enumerate("Orders", &[]).await.unwrap();
    assert_eq!(all.len(), 4);

    let err = rows
        .enumerate("Orders", &indexes(["9"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);
}

#[tokio::test]
async fn page_walks_the_log_in_sequence_order() {
    let store = store_with_orders().await;
    let rows = store.rows();
    for i in 0..5 {
        rows.insert("Orders", Bytes::from(format!("p{i}")), &indexes([i.to_string(), "NEW".to_string()]))
            .await
            .unwrap();
    }
    rows.delete("Orders", &indexes(["1", "NEW"])).await.unwrap();

    let first = rows.page("Orders", 1, 2).await.unwrap();
    let positions: Vec<u64> = first.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 3]);

    let second = rows.page("Orders", 2, 2).await.unwrap();
    let positions: Vec<u64> = second.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![4, 5]);

    let err = rows.page("Orders", 3, 2).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);
    let err = rows.page("Orders", 1, 0).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);
}

#[tokio::test]
async fn rejected_wildcard_update_leaves_row_in_place() {
    let store = store_with_orders().await;
    let rows = store.rows();
    let idx = indexes(["7", "PAID"]);
    rows.insert("Orders", Bytes::from_static(b"P1"), &idx).await.unwrap();

    let err = rows
        .update("Orders", Bytes::from_static(b"P2"), &[IndexValue::Wildcard, "PAID".into()])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);
    let err = rows
        .update("Orders", Bytes::from_static(b"P2"), &indexes(["*", "PAID"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);
    let err = rows
        .update("Orders", Bytes::from_static(b"P2"), &indexes(["7", ">"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);

    let row = rows.find("Orders", &idx).await.unwrap();
    assert_eq!(row.payload, Bytes::from_static(b"P1"));
    assert_eq!(row.position, 1);
}

#[tokio::test]
async fn literal_wildcard_insert_is_bad_request() {
    let store = store_with_orders().await;
    let err = store
        .rows()
        .insert("Orders", Bytes::from_static(b"x"), &indexes(["*", "NEW"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::BadRequest);
    let err = store.rows().enumerate("Orders", &[]).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);
}

#[tokio::test]
async fn wildcard_delete_removes_only_newest_match() {
    let store = store_with_orders().await;
    let rows = store.rows();
    for id in ["7", "8", "9"] {
        rows.insert("Orders", Bytes::from(id), &indexes([id, "PAID"]))
            .await
            .unwrap();
    }
    rows.delete("Orders", &[IndexValue::Wildcard, "PAID".into()])
        .await
        .unwrap();
    let left = rows.enumerate("Orders", &[]).await.unwrap();
    assert_eq!(left, vec!["Orders.7.PAID", "Orders.8.PAID"]);
}
