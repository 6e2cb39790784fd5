//! Stores configured from `subjectstore.toml`

use crate::common::init_tracing;
use bytes::Bytes;
use std::sync::Arc;
use subjectstore::{Store, StoreConfig};
use subjectstore_engine::{ConfigError, CONFIG_FILE_NAME};
use subjectstore_substrate::{MemoryKv, MemoryLog};
use tempfile::TempDir;

#[tokio::test]
async fn custom_file_drives_defaults_and_bucket() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
[model]
create_index_count = 3

[sections]
bucket = "Profiles"
"#,
    )
    .unwrap();

    let kv = Arc::new(MemoryKv::new());
    let store = Store::open(Arc::new(MemoryLog::new()), kv.clone(), &path).unwrap();
    assert_eq!(store.config().model.create_index_count, 3);
    // Unset keys keep their defaults
    assert_eq!(store.config().model.update_index_count, 1);

    store.models().create_with_defaults("Orders").await.unwrap();
    let template = store.models().describe_template("Orders").await.unwrap();
    assert_eq!(template.as_str(), "Orders.*.*.*");

    store
        .sections()
        .upsert("cfg", Bytes::from_static(b"v1"))
        .await
        .unwrap();
    assert_eq!(kv.bucket_names(), vec!["Profiles"]);
}

#[test]
fn invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[model]\ncreate_index_count = 0\n").unwrap();

    let result = Store::open(
        Arc::new(MemoryLog::new()),
        Arc::new(MemoryKv::new()),
        &path,
    );
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "model.create_index_count",
            ..
        })
    ));
}

#[test]
fn written_config_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let mut config = StoreConfig::default();
    config.model.max_msgs_per_subject = 5;
    config.sections.max_history = 10;
    config.write_to_file(&path).unwrap();

    assert_eq!(StoreConfig::from_file(&path).unwrap(), config);
}
