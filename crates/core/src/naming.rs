//! Model names and section keys
//!
//! Model names and section keys share one rule set, but are distinct types so
//! that a failure reports the right error code for the call site.
//!
//! ## Validation
//!
//! A name must:
//! - Be non-empty after trimming whitespace
//! - Not contain any reserved structural character: `# $ % ^ & > < * . !`
//!
//! The dot is the subject delimiter and `*` / `>` are substrate wildcards, so
//! letting any of them into a name would change the shape of every address
//! built from it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters that may not appear in a model name or section key.
pub const RESERVED_CHARS: [char; 10] = ['#', '$', '%', '^', '&', '>', '<', '*', '.', '!'];

/// Error when validating a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty or whitespace only
    Empty,
    /// Name contains a reserved character
    ReservedChar {
        /// The reserved character
        char: char,
        /// Character position of the first occurrence
        position: usize,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "name cannot be empty"),
            NameError::ReservedChar { char, position } => write!(
                f,
                "reserved character '{}' at position {} (#$%^&><*.! are not allowed)",
                char, position
            ),
        }
    }
}

impl std::error::Error for NameError {}

/// Validate a model name or section key.
pub fn validate_name(name: &str) -> std::result::Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    for (position, ch) in name.chars().enumerate() {
        if RESERVED_CHARS.contains(&ch) {
            return Err(NameError::ReservedChar { char: ch, position });
        }
    }
    Ok(())
}

/// Validated model name
///
/// A model name is the first segment of every row address and the name of
/// the backing log stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelName(String);

impl ModelName {
    /// Create a model name, validating the input
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModelName`] if the name is invalid.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name).map_err(|e| Error::invalid_model_name(&name, e))?;
        Ok(ModelName(name))
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validated section key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionKey(String);

impl SectionKey {
    /// Create a section key, validating the input
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSectionKey`] if the key is invalid.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_name(&key).map_err(|e| Error::invalid_section_key(&key, e))?;
        Ok(SectionKey(key))
    }

    /// Get the key as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! impl_name_traits {
    ($ty:ident) => {
        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                $ty::new(value)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                $ty::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.0
            }
        }
    };
}

impl_name_traits!(ModelName);
impl_name_traits!(SectionKey);
