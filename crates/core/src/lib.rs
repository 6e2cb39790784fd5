//! Core types for SubjectStore
//!
//! This crate defines the foundational types used throughout the system:
//! - Subject codec: row addresses, subject templates, wildcard filters
//! - Naming: validated model names and section keys
//! - Error: closed error taxonomy, each variant tied to a response code
//! - Response: the uniform result record every operation can be reported as
//! - Types: row messages, section entries, bulk-read results
//! - Serialization: JSON ↔ bytes helpers for the call boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod encoding;
pub mod error;
pub mod naming;
pub mod response;
pub mod serialization;
pub mod subject;
pub mod timestamp;
pub mod types;

pub use code::ResponseCode;
pub use error::{Error, Result};
pub use naming::{validate_name, ModelName, NameError, SectionKey, RESERVED_CHARS};
pub use response::{IntoResponse, Response, ResponseValue};
pub use serialization::{from_payload, to_payload};
pub use subject::{
    decode_address, encode_address, indexes, mask_address, subject_matches, IndexValue,
    SubjectTemplate,
};
pub use timestamp::Timestamp;
pub use types::{
    Ack, BulkRead, FoundRow, MissingRow, Operation, RowMessage, SectionEntry, SectionPair,
};
