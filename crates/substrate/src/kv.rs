//! KV substrate contract
//!
//! Named buckets of revisioned keys. Every write to a key appends a new
//! entry with the next revision for that key; deletes and purges are
//! recorded as marker entries.

use crate::error::Result;
use crate::log::StorageType;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subjectstore_core::{Operation, Timestamp};

/// Bucket configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name
    pub bucket: String,
    /// Entries retained per key, `0` for unbounded
    pub history: usize,
    /// Storage backend
    pub storage: StorageType,
}

impl BucketConfig {
    /// Config with unbounded history and file storage
    pub fn new(bucket: impl Into<String>) -> Self {
        BucketConfig {
            bucket: bucket.into(),
            history: 0,
            storage: StorageType::File,
        }
    }
}

/// One revision of a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    /// Bucket the entry belongs to
    pub bucket: String,
    /// Key
    pub key: String,
    /// Value, empty for markers
    pub value: Bytes,
    /// Revision of the key, starting at 1
    pub revision: u64,
    /// Write time
    pub created: Timestamp,
    /// Kind of write
    pub operation: Operation,
}

/// Source of bucket handles
#[async_trait]
pub trait KvSubstrate: Send + Sync {
    /// Bind to a bucket, creating it when missing.
    async fn bucket(&self, config: BucketConfig) -> Result<Arc<dyn KvBucket>>;
}

/// Handle to one bucket
#[async_trait]
pub trait KvBucket: Send + Sync {
    /// Bucket name
    fn name(&self) -> &str;

    /// Latest entry for a key, markers included.
    async fn get(&self, key: &str) -> Result<Option<KvEntry>>;

    /// Entry at an exact revision.
    async fn get_revision(&self, key: &str, revision: u64) -> Result<Option<KvEntry>>;

    /// Write only when the key has no live value; returns the revision.
    async fn create(&self, key: &str, value: Bytes) -> Result<u64>;

    /// Write unconditionally; returns the revision.
    async fn put(&self, key: &str, value: Bytes) -> Result<u64>;

    /// Append a delete marker, keeping history.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Drop history and append a purge marker.
    async fn purge(&self, key: &str) -> Result<()>;

    /// Keys whose latest entry is a put.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Retained entries of a key, oldest first.
    async fn history(&self, key: &str) -> Result<Vec<KvEntry>>;

    /// Remove the bucket with all its keys.
    async fn destroy(&self) -> Result<bool>;
}
