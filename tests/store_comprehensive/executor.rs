//! Command dispatch over a shared store

use crate::common::*;
use bytes::Bytes;
use subjectstore::{indexes, Command, Executor, Response, ResponseCode, ResponseValue};

#[tokio::test]
async fn commands_share_state_with_direct_calls() {
    let store = store_with_orders().await;
    let executor = Executor::new(store.clone());

    let resp = executor
        .execute(Command::RowInsert {
            model: "Orders".into(),
            payload: Bytes::from_static(b"P1"),
            indexes: indexes(["7", "PAID"]),
        })
        .await;
    assert_eq!(resp.code, ResponseCode::KeyCreated);

    let row = store.rows().find("Orders", &indexes(["7", "PAID"])).await.unwrap();
    assert_eq!(row.payload, Bytes::from_static(b"P1"));
}

#[tokio::test]
async fn commands_from_json_produce_json_responses() {
    let executor = Executor::new(create_store());
    let batch = r#"[
        {"ModelCreate": {"model": "Orders", "index_count": 2}},
        {"RowInsert": {"model": "Orders", "payload": "UDE=", "indexes": ["7", "PAID"]}},
        {"RowFind": {"model": "Orders", "indexes": ["7", null]}},
        "SectionKeys"
    ]"#;
    let commands: Vec<Command> = serde_json::from_str(batch).unwrap();
    let responses = executor.execute_many(commands).await;

    let json = serde_json::to_value(&responses).unwrap();
    assert_eq!(json[0]["code"], 2001);
    assert_eq!(json[1]["code"], 2004);
    assert_eq!(json[2]["code"], 2007);
    assert_eq!(json[2]["payload"]["type"], "bytes");
    assert_eq!(json[2]["payload"]["value"], "UDE=");
    assert_eq!(json[2]["position"], 1);
    assert_eq!(json[3]["code"], 2009);
    assert!(json[3].get("payload").is_none());

    let restored: Vec<Response> = serde_json::from_value(json).unwrap();
    assert_eq!(restored, responses);
}

#[tokio::test]
async fn failures_carry_code_and_message() {
    let executor = Executor::new(create_store());
    let resp = executor
        .execute(Command::RowEnumerate {
            model: "Missing".into(),
            prefix: Vec::new(),
        })
        .await;
    assert_eq!(resp.code, ResponseCode::ModelNotFound);
    assert!(resp.message.unwrap().contains("Missing"));
    assert!(resp.payload.is_none());
}

#[tokio::test]
async fn template_response_carries_subject() {
    let executor = Executor::new(store_with_orders().await);
    let resp = executor
        .execute(Command::ModelTemplate {
            model: "Orders".into(),
        })
        .await;
    assert_eq!(resp.payload, Some(ResponseValue::Subject("Orders.*.*".into())));
}
