//! Substrate error translation
//!
//! Every engine operation funnels substrate failures through [`translate`]
//! so callers only ever see the closed [`Error`] taxonomy.
//!
//! | Substrate failure | Error | Code |
//! |-------------------|-------|------|
//! | API 10059 | `ModelNotFound` | 10059 |
//! | API 10058 | `ModelConfigConflict` | 10058 |
//! | API 10037 | `NoMessageFound` | 10037 |
//! | API 10003 | `BadRequest` | 10003 |
//! | connection refused | `ConnectionRefused` | 500 |
//! | max payload, invalid request | `PayloadTooLarge` | 2022 |
//! | timeout | `Timeout` | 408 |
//! | anything else | `Unclassified` | 404 |

use subjectstore_core::Error;
use subjectstore_substrate::{api_codes, SubstrateError};
use tracing::warn;

/// What a failing substrate call was addressing
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A model stream
    Model(&'a str),
    /// A row address inside a model stream
    Row {
        /// Model name
        model: &'a str,
        /// Row address
        address: &'a str,
    },
    /// A section key inside the section bucket
    Section {
        /// Bucket name
        bucket: &'a str,
        /// Section key
        key: &'a str,
    },
    /// The section bucket itself
    Bucket(&'a str),
}

impl<'a> Target<'a> {
    fn stream(&self) -> &'a str {
        match *self {
            Target::Model(model) | Target::Row { model, .. } => model,
            Target::Section { bucket, .. } | Target::Bucket(bucket) => bucket,
        }
    }

    fn address(&self) -> &'a str {
        match *self {
            Target::Row { address, .. } => address,
            Target::Section { key, .. } => key,
            Target::Model(name) | Target::Bucket(name) => name,
        }
    }
}

/// Map a substrate failure onto the error taxonomy.
pub fn translate(err: SubstrateError, target: Target<'_>) -> Error {
    match err {
        SubstrateError::Api { code, .. } if code == api_codes::STREAM_NOT_FOUND => {
            Error::ModelNotFound {
                model: target.stream().to_string(),
            }
        }
        SubstrateError::Api { code, .. } if code == api_codes::STREAM_NAME_IN_USE => {
            Error::ModelConfigConflict {
                model: target.stream().to_string(),
            }
        }
        SubstrateError::Api { code, .. } if code == api_codes::NO_MESSAGE_FOUND => {
            Error::NoMessageFound {
                address: target.address().to_string(),
            }
        }
        SubstrateError::Api { code, description } if code == api_codes::BAD_REQUEST => {
            Error::BadRequest {
                reason: description,
            }
        }
        SubstrateError::ConnectionRefused(reason) => Error::ConnectionRefused { reason },
        err @ (SubstrateError::MaxPayload { .. } | SubstrateError::InvalidRequest(_)) => {
            Error::PayloadTooLarge {
                reason: err.to_string(),
            }
        }
        SubstrateError::Timeout(reason) => Error::Timeout { reason },
        other => {
            warn!(call = ?target, error = %other, "unclassified substrate failure");
            Error::Unclassified {
                reason: other.to_string(),
            }
        }
    }
}

/// Translate the error side of a substrate result.
pub(crate) trait Translate<T> {
    fn or_translate(self, target: Target<'_>) -> subjectstore_core::Result<T>;
}

impl<T> Translate<T> for subjectstore_substrate::Result<T> {
    fn or_translate(self, target: Target<'_>) -> subjectstore_core::Result<T> {
        self.map_err(|err| translate(err, target))
    }
}
