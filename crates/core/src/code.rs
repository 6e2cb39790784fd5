//! Response codes
//!
//! Every outcome of a public operation, success or failure, maps to exactly
//! one [`ResponseCode`]. The numeric values are part of the wire contract and
//! must never be renumbered.
//!
//! ## Ranges
//!
//! | Range | Meaning |
//! |-------|---------|
//! | `2001..=2026` | Operation outcomes and validation failures |
//! | `10003..=10059` | State failures reported by the log substrate |
//! | `404`, `408`, `500` | Transport-level and unclassified failures |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration of response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ResponseCode {
    // ==================== Success ====================
    /// Model stream registered
    ModelCreated = 2001,
    /// Model stream removed
    ModelDropped = 2002,
    /// Model subject template replaced
    ModelUpdated = 2003,
    /// Row or section written
    KeyCreated = 2004,
    /// Row or section deleted
    KeyDeleted = 2005,
    /// Row rewritten (delete + insert)
    KeyUpdated = 2006,
    /// Row or section entry found
    KeyFound = 2007,
    /// Enumeration returned at least one item
    RowsFound = 2008,
    /// Section history returned
    KeysFound = 2011,
    /// Model exists
    ModelFound = 2014,
    /// Bulk read finished (found and missing lists attached)
    BulkReadCompleted = 2021,
    /// Subject template found
    SubjectFound = 2023,

    // ==================== Not found ====================
    /// Enumeration returned nothing
    RowsNotFound = 2009,
    /// Section entry missing
    KeyNotFound = 2010,
    /// Subject template missing
    SubjectNotFound = 2024,
    /// No message at the requested address
    NoMessageFound = 10037,
    /// Model stream not registered
    ModelNotFound = 10059,

    // ==================== Validation ====================
    /// Model name empty or contains reserved characters
    InvalidModelName = 2012,
    /// Index count is not a positive integer
    InvalidIndexCount = 2013,
    /// Payload is not a byte sequence
    InvalidPayload = 2016,
    /// Supplied indexes differ from the model's index count
    CardinalityMismatch = 2017,
    /// Bulk read called with no addresses
    EmptyAddressList = 2018,
    /// Payload or name exceeds the substrate's maximum payload
    PayloadTooLarge = 2022,
    /// Section key empty or contains reserved characters
    InvalidSectionKey = 2025,
    /// Version is not a positive integer
    InvalidVersion = 2026,
    /// Malformed request
    BadRequest = 10003,

    // ==================== State ====================
    /// Model already registered
    ModelExists = 2015,
    /// Row already present at the address
    KeyExists = 2019,
    /// Substrate refused to remove the row
    KeyNotDeleted = 2020,
    /// Stream name in use with a different configuration
    ModelConfigConflict = 10058,

    // ==================== Transport ====================
    /// Unclassified substrate failure
    Unclassified = 404,
    /// Substrate reported a timeout
    Timeout = 408,
    /// Substrate connection refused
    ConnectionRefused = 500,
}

impl ResponseCode {
    /// All codes, in declaration order.
    pub const ALL: [ResponseCode; 33] = [
        ResponseCode::ModelCreated,
        ResponseCode::ModelDropped,
        ResponseCode::ModelUpdated,
        ResponseCode::KeyCreated,
        ResponseCode::KeyDeleted,
        ResponseCode::KeyUpdated,
        ResponseCode::KeyFound,
        ResponseCode::RowsFound,
        ResponseCode::KeysFound,
        ResponseCode::ModelFound,
        ResponseCode::BulkReadCompleted,
        ResponseCode::SubjectFound,
        ResponseCode::RowsNotFound,
        ResponseCode::KeyNotFound,
        ResponseCode::SubjectNotFound,
        ResponseCode::NoMessageFound,
        ResponseCode::ModelNotFound,
        ResponseCode::InvalidModelName,
        ResponseCode::InvalidIndexCount,
        ResponseCode::InvalidPayload,
        ResponseCode::CardinalityMismatch,
        ResponseCode::EmptyAddressList,
        ResponseCode::PayloadTooLarge,
        ResponseCode::InvalidSectionKey,
        ResponseCode::InvalidVersion,
        ResponseCode::BadRequest,
        ResponseCode::ModelExists,
        ResponseCode::KeyExists,
        ResponseCode::KeyNotDeleted,
        ResponseCode::ModelConfigConflict,
        ResponseCode::Unclassified,
        ResponseCode::Timeout,
        ResponseCode::ConnectionRefused,
    ];

    /// Numeric wire value.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Look up a code by its numeric wire value.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_u16() == value)
    }

    /// Canonical human-readable message.
    pub const fn message(self) -> &'static str {
        match self {
            ResponseCode::ModelCreated => "Model is created",
            ResponseCode::ModelDropped => "Model is deleted",
            ResponseCode::ModelUpdated => "Model is updated",
            ResponseCode::KeyCreated => "Key is created",
            ResponseCode::KeyDeleted => "Key is deleted",
            ResponseCode::KeyUpdated => "Key is updated",
            ResponseCode::KeyFound => "Key is found",
            ResponseCode::RowsFound => "rows is found",
            ResponseCode::KeysFound => "Keys is found",
            ResponseCode::ModelFound => "model is found",
            ResponseCode::BulkReadCompleted => "all rows values is completed process",
            ResponseCode::SubjectFound => "subject is found",
            ResponseCode::RowsNotFound => "rows not found",
            ResponseCode::KeyNotFound => "Key is not found",
            ResponseCode::SubjectNotFound => "subject is not found",
            ResponseCode::NoMessageFound => "no message found",
            ResponseCode::ModelNotFound => "Model not found",
            ResponseCode::InvalidModelName => {
                "Invalid modelName parameter: must be a non-empty string without characters (#$%^&><*.!)"
            }
            ResponseCode::InvalidIndexCount => {
                "Invalid numOfIndexes parameter: must be a positive integer"
            }
            ResponseCode::InvalidPayload => "data must be a byte sequence",
            ResponseCode::CardinalityMismatch => {
                "Invalid input: indexes must match the number of indexes the model is registered with"
            }
            ResponseCode::EmptyAddressList => "Invalid input: expected a non-empty list of row names",
            ResponseCode::PayloadTooLarge => "Invalid string length: max payload exceeded",
            ResponseCode::InvalidSectionKey => {
                "Invalid keyName parameter: must be a non-empty string without characters (#$%^&><*.!)"
            }
            ResponseCode::InvalidVersion => {
                "Invalid version parameter: must be a number greater than 0"
            }
            ResponseCode::BadRequest => "bad request",
            ResponseCode::ModelExists => "Model is created before",
            ResponseCode::KeyExists => "Key is created before",
            ResponseCode::KeyNotDeleted => "can't delete key",
            ResponseCode::ModelConfigConflict => {
                "Model already in use with a different configuration"
            }
            ResponseCode::Unclassified => "unclassified failure",
            ResponseCode::Timeout => "request timed out",
            ResponseCode::ConnectionRefused => "CONNECTION_REFUSED",
        }
    }

    /// Whether this code reports a successful operation.
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            ResponseCode::ModelCreated
                | ResponseCode::ModelDropped
                | ResponseCode::ModelUpdated
                | ResponseCode::KeyCreated
                | ResponseCode::KeyDeleted
                | ResponseCode::KeyUpdated
                | ResponseCode::KeyFound
                | ResponseCode::RowsFound
                | ResponseCode::KeysFound
                | ResponseCode::ModelFound
                | ResponseCode::BulkReadCompleted
                | ResponseCode::SubjectFound
        )
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.message())
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u16::deserialize(deserializer)?;
        ResponseCode::from_u16(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown response code {}", raw)))
    }
}
