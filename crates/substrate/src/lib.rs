//! Substrate contracts for SubjectStore
//!
//! The engines talk to two collaborators through async traits:
//! - [`LogSubstrate`]: append-only, subject-addressed streams
//! - [`KvSubstrate`] / [`KvBucket`]: revisioned key/value buckets
//!
//! [`memory`] provides in-process implementations of both.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kv;
pub mod log;
pub mod memory;

pub use error::{api_codes, Result, SubstrateError};
pub use kv::{BucketConfig, KvBucket, KvEntry, KvSubstrate};
pub use log::{
    DiscardPolicy, LogSubstrate, MessageQuery, PublishAck, RetentionPolicy, StorageType,
    StoredMessage, StreamConfig, StreamInfo, StreamState, SubjectState,
};
pub use memory::{MemoryKv, MemoryLog, DEFAULT_MAX_PAYLOAD};
