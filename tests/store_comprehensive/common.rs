//! Shared helpers for the store test suite

#![allow(dead_code)]

use std::sync::{Arc, Once};
use subjectstore::{Store, StoreConfig};
use subjectstore_substrate::{MemoryKv, MemoryLog};

static INIT_TRACING: Once = Once::new();

/// Route tracing output through the test harness once per binary.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Store plus handles on its substrates for fault injection
pub struct TestStore {
    pub store: Store,
    pub log: Arc<MemoryLog>,
    pub kv: Arc<MemoryKv>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_substrates(MemoryLog::new(), MemoryKv::new(), config)
    }

    pub fn with_substrates(log: MemoryLog, kv: MemoryKv, config: StoreConfig) -> Self {
        init_tracing();
        let log = Arc::new(log);
        let kv = Arc::new(kv);
        let store = Store::new(log.clone(), kv.clone(), config);
        TestStore { store, log, kv }
    }
}

/// Fresh store over default config
pub fn create_store() -> Store {
    TestStore::new().store
}

/// Store with an `Orders` model of two indexes
pub async fn store_with_orders() -> Store {
    let store = create_store();
    store.models().create("Orders", 2).await.unwrap();
    store
}
