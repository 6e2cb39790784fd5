//! JSON ↔ bytes helpers for callers that store structured values
//!
//! The engines only ever see raw bytes. These helpers sit at the call
//! boundary for callers that want to store serde types as JSON.

use crate::error::{Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a value into a JSON byte payload.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] if the value cannot be represented as JSON.
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Deserialize a JSON byte payload.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] if the bytes are not valid JSON for `T`.
pub fn from_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(Error::from)
}
