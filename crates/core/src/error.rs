//! Error types for SubjectStore
//!
//! All failures of public operations are represented by the [`Error`] enum.
//! Each variant maps to exactly one [`ResponseCode`], so any error can be
//! rendered as a uniform result record without losing its category.
//!
//! # Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Validation | `InvalidModelName`, `InvalidIndexCount`, `CardinalityMismatch`, `InvalidPayload`, `InvalidSectionKey`, `InvalidVersion`, `EmptyAddressList`, `BadRequest` |
//! | State | `ModelNotFound`, `ModelExists`, `ModelConfigConflict`, `NoMessageFound`, `RowExists`, `RowNotDeleted`, `RowsNotFound`, `SectionNotFound` |
//! | Substrate | `PayloadTooLarge`, `ConnectionRefused`, `Timeout`, `Unclassified` |

use crate::code::ResponseCode;
use crate::naming::NameError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for SubjectStore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SubjectStore operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Error {
    // ==================== Validation ====================
    /// Model name is empty or contains a reserved character
    #[error("invalid model name {name:?}: {reason}")]
    InvalidModelName { name: String, reason: String },

    /// Index count is not a positive integer
    #[error("invalid index count {count}: must be a positive integer")]
    InvalidIndexCount { count: usize },

    /// Supplied index values do not match the model's registered template
    #[error("cardinality mismatch: model expects {expected} segments, address has {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// Payload could not be represented as bytes
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// Section key is empty or contains a reserved character
    #[error("invalid section key {key:?}: {reason}")]
    InvalidSectionKey { key: String, reason: String },

    /// Requested version is not a positive integer
    #[error("invalid version {version}: must be greater than 0")]
    InvalidVersion { version: u64 },

    /// Bulk read called with an empty address list
    #[error("expected a non-empty list of row addresses")]
    EmptyAddressList,

    /// Malformed request
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    // ==================== State ====================
    /// Model stream is not registered
    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    /// Model stream is already registered
    #[error("model already exists: {model}")]
    ModelExists { model: String },

    /// Stream name is in use with a different configuration
    #[error("model {model} already in use with a different configuration")]
    ModelConfigConflict { model: String },

    /// No message exists at the address
    #[error("no message found at {address}")]
    NoMessageFound { address: String },

    /// A message already exists at the address
    #[error("row already exists at {address}")]
    RowExists { address: String },

    /// Substrate rejected removal of the message
    #[error("could not delete row at {address}")]
    RowNotDeleted { address: String },

    /// Enumeration matched nothing
    #[error("no rows match {filter}")]
    RowsNotFound { filter: String },

    /// Section entry is missing
    #[error("section not found: {key}")]
    SectionNotFound { key: String },

    // ==================== Substrate ====================
    /// Payload, name or template exceeds the substrate's max payload
    #[error("max payload exceeded: {reason}")]
    PayloadTooLarge { reason: String },

    /// Substrate connection refused
    #[error("connection refused: {reason}")]
    ConnectionRefused { reason: String },

    /// Substrate reported a timeout
    #[error("timeout: {reason}")]
    Timeout { reason: String },

    /// Substrate failure with no known classification
    #[error("unclassified substrate failure: {reason}")]
    Unclassified { reason: String },
}

impl Error {
    /// Response code this error is reported as.
    pub fn code(&self) -> ResponseCode {
        match self {
            Error::InvalidModelName { .. } => ResponseCode::InvalidModelName,
            Error::InvalidIndexCount { .. } => ResponseCode::InvalidIndexCount,
            Error::CardinalityMismatch { .. } => ResponseCode::CardinalityMismatch,
            Error::InvalidPayload { .. } => ResponseCode::InvalidPayload,
            Error::InvalidSectionKey { .. } => ResponseCode::InvalidSectionKey,
            Error::InvalidVersion { .. } => ResponseCode::InvalidVersion,
            Error::EmptyAddressList => ResponseCode::EmptyAddressList,
            Error::BadRequest { .. } => ResponseCode::BadRequest,
            Error::ModelNotFound { .. } => ResponseCode::ModelNotFound,
            Error::ModelExists { .. } => ResponseCode::ModelExists,
            Error::ModelConfigConflict { .. } => ResponseCode::ModelConfigConflict,
            Error::NoMessageFound { .. } => ResponseCode::NoMessageFound,
            Error::RowExists { .. } => ResponseCode::KeyExists,
            Error::RowNotDeleted { .. } => ResponseCode::KeyNotDeleted,
            Error::RowsNotFound { .. } => ResponseCode::RowsNotFound,
            Error::SectionNotFound { .. } => ResponseCode::KeyNotFound,
            Error::PayloadTooLarge { .. } => ResponseCode::PayloadTooLarge,
            Error::ConnectionRefused { .. } => ResponseCode::ConnectionRefused,
            Error::Timeout { .. } => ResponseCode::Timeout,
            Error::Unclassified { .. } => ResponseCode::Unclassified,
        }
    }

    /// Whether the error was detected before any substrate call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidModelName { .. }
                | Error::InvalidIndexCount { .. }
                | Error::CardinalityMismatch { .. }
                | Error::InvalidPayload { .. }
                | Error::InvalidSectionKey { .. }
                | Error::InvalidVersion { .. }
                | Error::EmptyAddressList
                | Error::BadRequest { .. }
        )
    }

    /// Whether the error reports an absent model, row or section.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ModelNotFound { .. }
                | Error::NoMessageFound { .. }
                | Error::RowsNotFound { .. }
                | Error::SectionNotFound { .. }
        )
    }

    pub(crate) fn invalid_model_name(name: &str, err: NameError) -> Self {
        Error::InvalidModelName {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn invalid_section_key(key: &str, err: NameError) -> Self {
        Error::InvalidSectionKey {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidPayload {
            reason: e.to_string(),
        }
    }
}
