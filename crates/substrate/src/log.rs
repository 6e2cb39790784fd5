//! Log substrate contract
//!
//! An append-only, subject-addressed log organised in named streams. Each
//! stream captures the subjects matched by its configured subject patterns
//! and assigns every appended message a per-stream sequence number.
//!
//! ## Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `create_stream` | Register a stream; idempotent for an identical config |
//! | `update_stream` | Replace the config of an existing stream |
//! | `delete_stream` | Remove a stream with all its messages |
//! | `stream_info` | Config and state, optionally with per-subject counts |
//! | `publish` | Append a message to the stream capturing its subject |
//! | `get_message` | Fetch by sequence or the last message on a subject |
//! | `delete_message` | Remove one message by sequence |

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use subjectstore_core::Timestamp;

/// Where a stream keeps its messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Persisted to disk by the broker
    #[default]
    File,
    /// Held in broker memory
    Memory,
}

/// When messages leave a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPolicy {
    /// Kept until a limit is reached
    #[default]
    Limits,
    /// Kept while consumers are interested
    Interest,
    /// Removed once acknowledged
    WorkQueue,
}

/// What happens when a limit is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardPolicy {
    /// Drop the oldest messages
    #[default]
    Old,
    /// Reject new messages
    New,
}

/// Stream configuration
///
/// Limits of `0` mean unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Stream name
    pub name: String,
    /// Subject patterns captured by the stream
    pub subjects: Vec<String>,
    /// Storage backend
    pub storage: StorageType,
    /// Retention policy
    pub retention: RetentionPolicy,
    /// Discard policy
    pub discard: DiscardPolicy,
    /// Maximum total payload bytes
    pub max_bytes: u64,
    /// Maximum message age in seconds
    pub max_age_secs: u64,
    /// Maximum number of messages
    pub max_messages: u64,
    /// Maximum size of one message
    pub max_message_size: u64,
    /// Maximum messages retained per subject
    pub max_messages_per_subject: u64,
    /// Replica count
    pub num_replicas: usize,
    /// Reject message deletion
    pub deny_delete: bool,
    /// Reject stream purges
    pub deny_purge: bool,
    /// Duplicate-detection window in seconds
    pub duplicate_window_secs: u64,
}

impl StreamConfig {
    /// Config with default limits for a named stream
    pub fn new(name: impl Into<String>, subjects: Vec<String>) -> Self {
        StreamConfig {
            name: name.into(),
            subjects,
            ..StreamConfig::default()
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            name: String::new(),
            subjects: Vec::new(),
            storage: StorageType::File,
            retention: RetentionPolicy::Limits,
            discard: DiscardPolicy::Old,
            max_bytes: 100 * 1024 * 1024,
            max_age_secs: 0,
            max_messages: 0,
            max_message_size: 0,
            max_messages_per_subject: 0,
            num_replicas: 1,
            deny_delete: false,
            deny_purge: false,
            duplicate_window_secs: 0,
        }
    }
}

/// Message count for one live subject of a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectState {
    /// Subject
    pub subject: String,
    /// Messages currently stored on the subject
    pub messages: u64,
    /// Sequence of the oldest stored message on the subject
    pub first_seq: u64,
}

/// Point-in-time state of a stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamState {
    /// Stored messages
    pub messages: u64,
    /// Stored payload bytes
    pub bytes: u64,
    /// Sequence of the oldest stored message, 0 when empty
    pub first_seq: u64,
    /// Highest sequence ever assigned, 0 when nothing was published
    pub last_seq: u64,
    /// Distinct live subjects
    pub num_subjects: u64,
    /// Live subjects matching the requested filter, ordered by first
    /// stored sequence. `None` when no filter was given or nothing matched.
    pub subjects: Option<Vec<SubjectState>>,
}

/// Stream config together with its state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Current configuration
    pub config: StreamConfig,
    /// Current state
    pub state: StreamState,
    /// Creation time
    pub created: Timestamp,
}

/// Acknowledgement of an appended message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAck {
    /// Stream that captured the message
    pub stream: String,
    /// Assigned sequence
    pub sequence: u64,
}

/// A message as stored in a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Subject the message was published to
    pub subject: String,
    /// Sequence within the stream
    pub sequence: u64,
    /// Payload
    pub payload: Bytes,
    /// Append time
    pub time: Timestamp,
}

/// Selector for [`LogSubstrate::get_message`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageQuery {
    /// Exact sequence
    Sequence(u64),
    /// Most recent message whose subject matches, wildcards allowed
    LastBySubject(String),
}

/// Append-only, subject-addressed log
#[async_trait]
pub trait LogSubstrate: Send + Sync {
    /// Register a stream.
    ///
    /// Creating a stream that already exists with an identical config
    /// succeeds; a different config fails with the name-in-use API code.
    async fn create_stream(&self, config: StreamConfig) -> Result<StreamInfo>;

    /// Replace the config of an existing stream, keeping its messages.
    async fn update_stream(&self, config: StreamConfig) -> Result<StreamInfo>;

    /// Remove a stream and all its messages.
    async fn delete_stream(&self, name: &str) -> Result<bool>;

    /// Stream config and state.
    ///
    /// With a `subjects_filter`, [`StreamState::subjects`] lists the live
    /// subjects matching it.
    async fn stream_info(&self, name: &str, subjects_filter: Option<&str>) -> Result<StreamInfo>;

    /// Append a message to the stream capturing `subject`.
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<PublishAck>;

    /// Fetch one message.
    async fn get_message(&self, stream: &str, query: MessageQuery) -> Result<StoredMessage>;

    /// Remove one message; `false` when the stream refused the removal.
    async fn delete_message(&self, stream: &str, sequence: u64) -> Result<bool>;
}
