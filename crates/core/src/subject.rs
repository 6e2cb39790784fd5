//! Subject codec
//!
//! Rows are addressed by subjects of the form `<model>.<i1>.<i2>...<in>`.
//! This module builds those subjects from index values, splits them back
//! into segments, and builds wildcard filters for partial-key enumeration.
//!
//! ## Placeholder normalization
//!
//! `.` is the segment delimiter and a space is not a valid subject character,
//! so both are replaced by [`PLACEHOLDER`] inside index values. The mapping is
//! lossy: `"a.b"` and `"a@b"` encode to the same segment.
//!
//! ```
//! use subjectstore_core::subject::{decode_address, encode_address, IndexValue};
//!
//! let address = encode_address("Orders", &["7".into(), "NEW YORK".into()]);
//! assert_eq!(address, "Orders.7.NEW@YORK");
//! assert_eq!(decode_address(&address), vec!["Orders", "7", "NEW@YORK"]);
//! ```
//!
//! ## Empty values
//!
//! An empty index value never produces an empty segment; it is skipped. A
//! caller that passes fewer usable values than the model has indexes gets a
//! cardinality mismatch rather than a silently padded address.

use crate::error::{Error, Result};
use crate::naming::ModelName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment delimiter
pub const DELIMITER: char = '.';

/// Replacement for `.` and ` ` inside index values
pub const PLACEHOLDER: char = '@';

/// Single-token wildcard
pub const WILDCARD: &str = "*";

/// Multi-token trailing wildcard
pub const FULL_WILDCARD: &str = ">";

/// One index position of a row address
///
/// Unknown positions are explicit [`IndexValue::Wildcard`] markers rather
/// than omitted trailing arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexValue {
    /// Literal index value
    Value(String),
    /// Matches any single segment
    Wildcard,
}

impl IndexValue {
    /// Encoded segment, or `None` when the value is empty.
    pub fn encode(&self) -> Option<String> {
        match self {
            IndexValue::Value(raw) => {
                let scrubbed = scrub(raw);
                if scrubbed.is_empty() {
                    None
                } else {
                    Some(scrubbed)
                }
            }
            IndexValue::Wildcard => Some(WILDCARD.to_string()),
        }
    }

    /// Whether this position is a wildcard
    pub fn is_wildcard(&self) -> bool {
        matches!(self, IndexValue::Wildcard)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Value(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Value(value)
    }
}

impl From<&String> for IndexValue {
    fn from(value: &String) -> Self {
        IndexValue::Value(value.clone())
    }
}

macro_rules! impl_index_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for IndexValue {
                fn from(value: $ty) -> Self {
                    IndexValue::Value(value.to_string())
                }
            }
        )*
    };
}

impl_index_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T: Into<IndexValue>> From<Option<T>> for IndexValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(IndexValue::Wildcard)
    }
}

/// Collect anything convertible into index values.
pub fn indexes<I, T>(values: I) -> Vec<IndexValue>
where
    I: IntoIterator<Item = T>,
    T: Into<IndexValue>,
{
    values.into_iter().map(Into::into).collect()
}

/// Replace delimiter and space characters with the placeholder.
pub fn scrub(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == DELIMITER || c == ' ' { PLACEHOLDER } else { c })
        .collect()
}

/// Encode index values into segments, skipping empty ones.
pub fn encode_indexes(values: &[IndexValue]) -> Vec<String> {
    values.iter().filter_map(IndexValue::encode).collect()
}

/// Build the canonical row address for a model and its index values.
pub fn encode_address(model: &str, values: &[IndexValue]) -> String {
    let mut address = String::from(model);
    for segment in encode_indexes(values) {
        address.push(DELIMITER);
        address.push_str(&segment);
    }
    address
}

/// Split an address into its segments.
///
/// An empty address decodes to a single empty segment.
pub fn decode_address(address: &str) -> Vec<String> {
    if address.is_empty() {
        return vec![String::new()];
    }
    address.split(DELIMITER).map(str::to_string).collect()
}

/// Number of segments in an address.
pub fn segment_count(address: &str) -> usize {
    if address.is_empty() {
        1
    } else {
        address.split(DELIMITER).count()
    }
}

/// Split a fully-qualified address into its model name and index segments.
pub fn split_address(address: &str) -> (String, Vec<String>) {
    let mut segments = decode_address(address);
    let model = segments.remove(0);
    (model, segments)
}

/// NATS-style subject matching.
///
/// `*` matches exactly one token, `>` matches one or more trailing tokens.
/// Literal tokens must match exactly.
pub fn subject_matches(filter: &str, subject: &str) -> bool {
    let mut filter_tokens = filter.split(DELIMITER);
    let mut subject_tokens = subject.split(DELIMITER);
    loop {
        match (filter_tokens.next(), subject_tokens.next()) {
            (Some(FULL_WILDCARD), Some(_)) => return true,
            (Some(WILDCARD), Some(_)) => continue,
            (Some(f), Some(s)) if f == s => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Whether a subject contains wildcard tokens.
pub fn is_pattern(subject: &str) -> bool {
    subject
        .split(DELIMITER)
        .any(|token| token == WILDCARD || token == FULL_WILDCARD)
}

/// A model's registered subject template, e.g. `Orders.*.*`
///
/// The template fixes the number of segments every row address of the
/// model must have.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectTemplate(String);

impl SubjectTemplate {
    /// Template with `index_count` wildcard segments after the model name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndexCount`] when `index_count` is zero.
    pub fn for_model(model: &ModelName, index_count: usize) -> Result<Self> {
        if index_count < 1 {
            return Err(Error::InvalidIndexCount { count: index_count });
        }
        let mut raw = String::with_capacity(model.as_str().len() + index_count * 2);
        raw.push_str(model.as_str());
        for _ in 0..index_count {
            raw.push(DELIMITER);
            raw.push_str(WILDCARD);
        }
        Ok(SubjectTemplate(raw))
    }

    /// Wrap a template string reported by the log substrate.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        SubjectTemplate(raw.into())
    }

    /// Template as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of segments, model name included
    pub fn segment_count(&self) -> usize {
        segment_count(&self.0)
    }

    /// Number of index segments
    pub fn index_count(&self) -> usize {
        self.segment_count().saturating_sub(1)
    }

    /// Leading model segment
    pub fn model(&self) -> &str {
        self.0.split(DELIMITER).next().unwrap_or_default()
    }

    /// Check that an address has exactly this template's shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CardinalityMismatch`] on a segment count difference.
    pub fn check_cardinality(&self, address: &str) -> Result<()> {
        let expected = self.segment_count();
        let actual = segment_count(address);
        if expected != actual {
            return Err(Error::CardinalityMismatch { expected, actual });
        }
        Ok(())
    }

    /// Overlay known leading values onto the template.
    ///
    /// Positions not covered by `known` stay wildcards, producing a filter
    /// for substrate-side pattern matching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CardinalityMismatch`] when more values are supplied
    /// than the template has index positions.
    pub fn mask(&self, known: &[IndexValue]) -> Result<String> {
        let mut segments = decode_address(&self.0);
        let known = encode_indexes(known);
        if known.len() + 1 > segments.len() {
            return Err(Error::CardinalityMismatch {
                expected: segments.len(),
                actual: known.len() + 1,
            });
        }
        for (slot, value) in segments.iter_mut().skip(1).zip(known) {
            *slot = value;
        }
        Ok(segments.join(&DELIMITER.to_string()))
    }
}

impl fmt::Display for SubjectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubjectTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build a filter address from a template and a prefix of known values.
///
/// See [`SubjectTemplate::mask`].
pub fn mask_address(template: &SubjectTemplate, known: &[IndexValue]) -> Result<String> {
    template.mask(known)
}
