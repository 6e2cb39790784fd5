use super::{Link, DEFAULT_MAX_PAYLOAD};
use crate::error::{api_codes, Result, SubstrateError};
use crate::kv::{BucketConfig, KvBucket, KvEntry, KvSubstrate};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use subjectstore_core::{Operation, Timestamp};
use tracing::debug;

type Registry = DashMap<String, Arc<MemoryBucket>>;

#[derive(Default)]
struct KeyLog {
    entries: Vec<KvEntry>,
    revision: u64,
}

impl KeyLog {
    fn latest(&self) -> Option<&KvEntry> {
        self.entries.last()
    }
}

/// In-memory KV substrate
pub struct MemoryKv {
    buckets: Arc<Registry>,
    link: Arc<Link>,
}

impl MemoryKv {
    /// KV with the default 1 MiB max payload
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    /// KV with a custom max payload
    pub fn with_max_payload(max_payload: usize) -> Self {
        MemoryKv {
            buckets: Arc::new(DashMap::new()),
            link: Arc::new(Link::new(max_payload)),
        }
    }

    /// Simulate losing or regaining the connection
    pub fn set_online(&self, online: bool) {
        self.link.set_online(online);
    }

    /// Names of the existing buckets, sorted
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvSubstrate for MemoryKv {
    async fn bucket(&self, config: BucketConfig) -> Result<Arc<dyn KvBucket>> {
        self.link.check()?;
        if config.bucket.is_empty() {
            return Err(SubstrateError::InvalidRequest(
                "bucket name is required".to_string(),
            ));
        }
        let bucket: Arc<dyn KvBucket> = self
            .buckets
            .entry(config.bucket.clone())
            .or_insert_with(|| {
                debug!(bucket = %config.bucket, history = config.history, "bucket created");
                Arc::new(MemoryBucket {
                    config: config.clone(),
                    keys: RwLock::new(BTreeMap::new()),
                    destroyed: AtomicBool::new(false),
                    link: Arc::clone(&self.link),
                    registry: Arc::downgrade(&self.buckets),
                })
            })
            .value()
            .clone();
        Ok(bucket)
    }
}

/// Bucket held by [`MemoryKv`]
pub struct MemoryBucket {
    config: BucketConfig,
    keys: RwLock<BTreeMap<String, KeyLog>>,
    destroyed: AtomicBool,
    link: Arc<Link>,
    registry: Weak<Registry>,
}

impl MemoryBucket {
    fn check(&self) -> Result<()> {
        self.link.check()?;
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(SubstrateError::api(
                api_codes::STREAM_NOT_FOUND,
                "bucket not found",
            ));
        }
        Ok(())
    }

    fn append(&self, key: &str, value: Bytes, operation: Operation) -> Result<u64> {
        let mut keys = self.keys.write();
        let log = keys.entry(key.to_string()).or_default();
        Ok(self.push(log, key, value, operation))
    }

    fn push(&self, log: &mut KeyLog, key: &str, value: Bytes, operation: Operation) -> u64 {
        log.revision += 1;
        log.entries.push(KvEntry {
            bucket: self.config.bucket.clone(),
            key: key.to_string(),
            value,
            revision: log.revision,
            created: Timestamp::now(),
            operation,
        });
        let history = self.config.history;
        if history > 0 && log.entries.len() > history {
            let excess = log.entries.len() - history;
            log.entries.drain(..excess);
        }
        log.revision
    }
}

#[async_trait]
impl KvBucket for MemoryBucket {
    fn name(&self) -> &str {
        &self.config.bucket
    }

    async fn get(&self, key: &str) -> Result<Option<KvEntry>> {
        self.check()?;
        Ok(self.keys.read().get(key).and_then(KeyLog::latest).cloned())
    }

    async fn get_revision(&self, key: &str, revision: u64) -> Result<Option<KvEntry>> {
        self.check()?;
        Ok(self.keys.read().get(key).and_then(|log| {
            log.entries
                .iter()
                .find(|entry| entry.revision == revision)
                .cloned()
        }))
    }

    async fn create(&self, key: &str, value: Bytes) -> Result<u64> {
        self.check()?;
        self.link.check_payload(value.len())?;
        let mut keys = self.keys.write();
        let log = keys.entry(key.to_string()).or_default();
        if log.latest().map_or(false, |entry| entry.operation == Operation::Put) {
            return Err(SubstrateError::api(
                api_codes::WRONG_LAST_SEQUENCE,
                format!("wrong last sequence: {}", log.revision),
            ));
        }
        Ok(self.push(log, key, value, Operation::Put))
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<u64> {
        self.check()?;
        self.link.check_payload(value.len())?;
        self.append(key, value, Operation::Put)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.append(key, Bytes::new(), Operation::Delete)?;
        Ok(())
    }

    async fn purge(&self, key: &str) -> Result<()> {
        self.check()?;
        let mut keys = self.keys.write();
        let log = keys.entry(key.to_string()).or_default();
        log.entries.clear();
        self.push(log, key, Bytes::new(), Operation::Purge);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.check()?;
        Ok(self
            .keys
            .read()
            .iter()
            .filter(|(_, log)| log.latest().map_or(false, |e| e.operation == Operation::Put))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn history(&self, key: &str) -> Result<Vec<KvEntry>> {
        self.check()?;
        Ok(self
            .keys
            .read()
            .get(key)
            .map(|log| log.entries.clone())
            .unwrap_or_default())
    }

    async fn destroy(&self) -> Result<bool> {
        self.check()?;
        self.destroyed.store(true, Ordering::SeqCst);
        self.keys.write().clear();
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.config.bucket);
        }
        debug!(bucket = %self.config.bucket, "bucket destroyed");
        Ok(true)
    }
}
