//! Model lifecycle tests

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, Error, ResponseCode};

#[tokio::test]
async fn create_registers_wildcard_template() {
    let store = create_store();
    store.models().create("Orders", 3).await.unwrap();

    let template = store.models().describe_template("Orders").await.unwrap();
    assert_eq!(template.as_str(), "Orders.*.*.*");
    assert_eq!(template.index_count(), 3);
    assert!(store.models().exists("Orders").await.unwrap());
}

#[tokio::test]
async fn duplicate_create_reports_existing_model() {
    let store = store_with_orders().await;

    let same = store.models().create("Orders", 2).await.unwrap_err();
    assert_eq!(same.code(), ResponseCode::ModelExists);

    // A different index count does not turn into a config conflict
    let different = store.models().create("Orders", 5).await.unwrap_err();
    assert!(matches!(different, Error::ModelExists { .. }));
}

#[tokio::test]
async fn invalid_names_are_rejected_before_any_call() {
    let store = create_store();
    for name in ["", "a.b", "a*", "price$", "x>y"] {
        let err = store.models().create(name, 1).await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::InvalidModelName, "name {:?}", name);
        assert!(err.is_validation());
    }
    let err = store.models().create("Orders", 0).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::InvalidIndexCount);
}

#[tokio::test]
async fn update_replaces_template() {
    let store = store_with_orders().await;
    store.models().update("Orders", 4).await.unwrap();
    let template = store.models().describe_template("Orders").await.unwrap();
    assert_eq!(template.index_count(), 4);

    let err = store.models().update("Users", 1).await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::ModelNotFound);
}

#[tokio::test]
async fn update_with_defaults_uses_configured_count() {
    let store = store_with_orders().await;
    store.models().update_with_defaults("Orders").await.unwrap();
    let template = store.models().describe_template("Orders").await.unwrap();
    assert_eq!(
        template.index_count(),
        store.config().model.update_index_count
    );
}

#[tokio::test]
async fn drop_removes_model_and_rows() {
    let store = store_with_orders().await;
    store
        .rows()
        .insert("Orders", Bytes::from_static(b"P1"), &indexes(["7", "PAID"]))
        .await
        .unwrap();

    store.models().drop("Orders").await.unwrap();
    assert!(!store.models().exists("Orders").await.unwrap());

    let err = store
        .rows()
        .find("Orders", &indexes(["7", "PAID"]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ResponseCode::ModelNotFound);

    let err = store.models().drop("Orders").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::ModelNotFound);
}

#[tokio::test]
async fn last_row_tracks_latest_append() {
    let store = store_with_orders().await;
    let err = store.models().last_row("Orders").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);

    for (i, status) in ["NEW", "PAID", "SHIPPED"].iter().enumerate() {
        store
            .rows()
            .insert("Orders", Bytes::from_static(b"x"), &indexes([i.to_string(), status.to_string()]))
            .await
            .unwrap();
    }
    let last = store.models().last_row("Orders").await.unwrap();
    assert_eq!(last.subject, "Orders.2.SHIPPED");
    assert_eq!(last.position, 3);
}

#[tokio::test]
async fn models_are_isolated() {
    let store = store_with_orders().await;
    store.models().create("Users", 1).await.unwrap();
    store
        .rows()
        .insert("Users", Bytes::from_static(b"u"), &indexes(["7"]))
        .await
        .unwrap();

    let err = store.models().last_row("Orders").await.unwrap_err();
    assert_eq!(err.code(), ResponseCode::RowsNotFound);
    assert_eq!(
        store.models().last_row("Users").await.unwrap().subject,
        "Users.7"
    );
}
