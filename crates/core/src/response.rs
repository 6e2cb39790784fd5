//! Uniform result record
//!
//! Every public operation can be reported as a [`Response`]:
//!
//! ```text
//! { code: u16, message?: string, payload?: ResponseValue, position?: u64 }
//! ```
//!
//! Typed operations return `Result<T>`; [`Response::from_result`] performs the
//! conversion for any `T: IntoResponse`, so callers that want the flat record
//! never have to match on errors themselves.

use crate::code::ResponseCode;
use crate::error::{Error, Result};
use crate::subject::SubjectTemplate;
use crate::types::{Ack, BulkRead, RowMessage, SectionEntry, SectionPair};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Value attached to a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseValue {
    /// Raw payload of a row or section
    Bytes(#[serde(with = "crate::encoding::base64_bytes")] Bytes),
    /// A single subject or template
    Subject(String),
    /// Subjects or section keys
    Subjects(Vec<String>),
    /// Messages of a model page
    Rows(Vec<RowMessage>),
    /// Found and missing bulk-read lists
    Bulk(BulkRead),
    /// Section revisions, oldest first
    History(Vec<SectionEntry>),
    /// Section keys with their values
    Pairs(Vec<SectionPair>),
}

/// Uniform result record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome code
    pub code: ResponseCode,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Attached value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponseValue>,
    /// Log sequence or section revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl Response {
    /// Response carrying only a code and its canonical message
    pub fn code(code: ResponseCode) -> Self {
        Response {
            code,
            message: Some(code.message().to_string()),
            payload: None,
            position: None,
        }
    }

    /// Attach a value
    pub fn with_payload(mut self, payload: ResponseValue) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a position
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    /// Response for a failed operation
    pub fn from_error(err: &Error) -> Self {
        Response {
            code: err.code(),
            message: Some(err.to_string()),
            payload: None,
            position: None,
        }
    }

    /// Flatten a typed outcome into a record
    pub fn from_result<T: IntoResponse>(result: Result<T>) -> Self {
        match result {
            Ok(value) => value.into_response(),
            Err(err) => Response::from_error(&err),
        }
    }

    /// Whether the code reports success
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Payload bytes, when the value is a raw payload
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.payload {
            Some(ResponseValue::Bytes(b)) => Some(b),
            _ => None,
        }
    }
}

/// Conversion of a successful typed outcome into a [`Response`]
pub trait IntoResponse {
    /// Build the record
    fn into_response(self) -> Response;
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        Response::code(self.code())
    }
}

impl IntoResponse for RowMessage {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::KeyFound)
            .with_payload(ResponseValue::Bytes(self.payload))
            .with_position(self.position)
    }
}

impl IntoResponse for SectionEntry {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::KeyFound)
            .with_payload(ResponseValue::Bytes(self.payload))
            .with_position(self.revision)
    }
}

impl IntoResponse for SubjectTemplate {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::SubjectFound)
            .with_payload(ResponseValue::Subject(self.as_str().to_string()))
    }
}

impl IntoResponse for Vec<String> {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::RowsFound).with_payload(ResponseValue::Subjects(self))
    }
}

impl IntoResponse for Vec<RowMessage> {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::RowsFound).with_payload(ResponseValue::Rows(self))
    }
}

impl IntoResponse for BulkRead {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::BulkReadCompleted).with_payload(ResponseValue::Bulk(self))
    }
}

impl IntoResponse for Vec<SectionEntry> {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::KeysFound).with_payload(ResponseValue::History(self))
    }
}

impl IntoResponse for Vec<SectionPair> {
    fn into_response(self) -> Response {
        Response::code(ResponseCode::RowsFound).with_payload(ResponseValue::Pairs(self))
    }
}
