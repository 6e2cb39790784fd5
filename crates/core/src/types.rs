//! Records returned by row and section operations

use crate::code::ResponseCode;
use crate::timestamp::Timestamp;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of write that produced a section revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Value written
    #[serde(rename = "PUT")]
    Put,
    /// Soft-delete marker, history retained
    #[serde(rename = "DEL")]
    Delete,
    /// Purge marker, prior history removed
    #[serde(rename = "PURGE")]
    Purge,
}

impl Operation {
    /// Wire name of the operation
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Put => "PUT",
            Operation::Delete => "DEL",
            Operation::Purge => "PURGE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message stored at a row address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMessage {
    /// Full subject the message was published to
    pub subject: String,
    /// Raw payload
    #[serde(with = "crate::encoding::base64_bytes")]
    pub payload: Bytes,
    /// Log sequence of the message within its model
    pub position: u64,
    /// Time the message was appended
    pub time: Timestamp,
}

/// One revision of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Section key
    pub key: String,
    /// Value written at this revision (empty for markers)
    #[serde(with = "crate::encoding::base64_bytes")]
    pub payload: Bytes,
    /// Revision assigned by the KV substrate
    pub revision: u64,
    /// Time the revision was written
    pub created: Timestamp,
    /// Kind of write
    pub operation: Operation,
}

impl SectionEntry {
    /// Whether this revision holds a live value
    pub fn is_put(&self) -> bool {
        self.operation == Operation::Put
    }
}

/// A section key with its working value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPair {
    /// Section key
    pub key: String,
    /// Current value
    #[serde(with = "crate::encoding::base64_bytes")]
    pub payload: Bytes,
}

/// A bulk-read address that resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundRow {
    /// Address as supplied by the caller
    pub address: String,
    /// Payload of the most recent message
    #[serde(with = "crate::encoding::base64_bytes")]
    pub payload: Bytes,
    /// Log sequence of the message
    pub position: u64,
}

/// A bulk-read address that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRow {
    /// Address as supplied by the caller
    pub address: String,
    /// Why it failed
    pub code: ResponseCode,
    /// Error text
    pub reason: String,
}

/// Result of a bulk read: every address lands in exactly one list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRead {
    /// Addresses that resolved
    pub found: Vec<FoundRow>,
    /// Addresses that did not
    pub missing: Vec<MissingRow>,
}

impl BulkRead {
    /// Total number of addresses processed
    pub fn len(&self) -> usize {
        self.found.len() + self.missing.len()
    }

    /// Whether no address was processed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acknowledgement of a write that returns no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ack {
    /// Model stream registered
    ModelCreated,
    /// Model template replaced
    ModelUpdated,
    /// Model stream removed
    ModelDropped,
    /// Row appended
    RowInserted,
    /// Row removed
    RowDeleted,
    /// Row rewritten
    RowUpdated,
    /// Section soft-deleted
    SectionDeleted,
    /// Section purged
    SectionPurged,
    /// Section namespace removed
    SectionsDestroyed,
}

impl Ack {
    /// Response code reported for this acknowledgement
    pub const fn code(self) -> ResponseCode {
        match self {
            Ack::ModelCreated => ResponseCode::ModelCreated,
            Ack::ModelUpdated => ResponseCode::ModelUpdated,
            Ack::ModelDropped => ResponseCode::ModelDropped,
            Ack::RowInserted => ResponseCode::KeyCreated,
            Ack::RowDeleted
            | Ack::SectionDeleted
            | Ack::SectionPurged
            | Ack::SectionsDestroyed => ResponseCode::KeyDeleted,
            Ack::RowUpdated => ResponseCode::KeyUpdated,
        }
    }
}
