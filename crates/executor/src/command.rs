//! Command enum defining all SubjectStore operations.
//!
//! Commands are the instruction set of the store. Each variant carries every
//! parameter its operation needs and serializes to JSON, so a command can be
//! built in one process and executed in another.
//!
//! # Command Categories
//!
//! | Category | Count | Description |
//! |----------|-------|-------------|
//! | Model | 6 | Model lifecycle and inspection |
//! | Row | 6 | Indexed row operations |
//! | Bulk | 1 | Fan-out reads across models |
//! | Section | 10 | Versioned key/value sections |

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use subjectstore_core::IndexValue;

/// A self-contained, serializable operation.
///
/// Index values serialize as strings, with `null` standing for a wildcard.
/// Payloads serialize as base64 strings.
///
/// # Example
///
/// ```
/// use subjectstore_executor::Command;
///
/// let cmd: Command = serde_json::from_str(
///     r#"{"RowFind":{"model":"Orders","indexes":["7",null]}}"#,
/// ).unwrap();
/// assert_eq!(cmd.name(), "RowFind");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Model (6) ====================
    /// Register a model.
    /// Without `index_count`, the configured default is used.
    ModelCreate {
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_count: Option<usize>,
    },

    /// Replace a model's template.
    /// Without `index_count`, the configured default is used.
    ModelUpdate {
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_count: Option<usize>,
    },

    /// Remove a model and its rows.
    ModelDrop { model: String },

    /// Check whether a model is registered.
    ModelExists { model: String },

    /// Registered subject template of a model.
    ModelTemplate { model: String },

    /// Subject and position of the most recent message in a model.
    ModelLastRow { model: String },

    // ==================== Row (6) ====================
    /// Most recent message at a row address.
    RowFind {
        model: String,
        indexes: Vec<IndexValue>,
    },

    /// Append a row that does not exist yet.
    RowInsert {
        model: String,
        #[serde(with = "subjectstore_core::encoding::base64_bytes")]
        payload: Bytes,
        indexes: Vec<IndexValue>,
    },

    /// Remove a row.
    RowDelete {
        model: String,
        indexes: Vec<IndexValue>,
    },

    /// Replace a row.
    RowUpdate {
        model: String,
        #[serde(with = "subjectstore_core::encoding::base64_bytes")]
        payload: Bytes,
        indexes: Vec<IndexValue>,
    },

    /// Live subjects matching a prefix of index values.
    RowEnumerate {
        model: String,
        #[serde(default)]
        prefix: Vec<IndexValue>,
    },

    /// One page of a model's messages, 1-based.
    RowPage {
        model: String,
        page: usize,
        page_size: usize,
    },

    // ==================== Bulk (1) ====================
    /// Resolve many fully-qualified row addresses.
    BulkRead { addresses: Vec<String> },

    // ==================== Section (10) ====================
    /// Write a section.
    SectionUpsert {
        key: String,
        #[serde(with = "subjectstore_core::encoding::base64_bytes")]
        payload: Bytes,
    },

    /// Latest entry of a section.
    SectionGet { key: String },

    /// Latest live value of a section.
    SectionGetWorking { key: String },

    /// Section at an exact revision.
    SectionGetVersion { key: String, version: u64 },

    /// Soft-delete a section.
    SectionDelete { key: String },

    /// Purge a section's history.
    SectionForceDelete { key: String },

    /// Retained revisions of a section.
    SectionHistory { key: String },

    /// Keys of live sections.
    SectionKeys,

    /// Live sections with their values.
    SectionKeyValues,

    /// Remove every section.
    SectionDestroy,
}

impl Command {
    /// Variant name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::ModelCreate { .. } => "ModelCreate",
            Command::ModelUpdate { .. } => "ModelUpdate",
            Command::ModelDrop { .. } => "ModelDrop",
            Command::ModelExists { .. } => "ModelExists",
            Command::ModelTemplate { .. } => "ModelTemplate",
            Command::ModelLastRow { .. } => "ModelLastRow",
            Command::RowFind { .. } => "RowFind",
            Command::RowInsert { .. } => "RowInsert",
            Command::RowDelete { .. } => "RowDelete",
            Command::RowUpdate { .. } => "RowUpdate",
            Command::RowEnumerate { .. } => "RowEnumerate",
            Command::RowPage { .. } => "RowPage",
            Command::BulkRead { .. } => "BulkRead",
            Command::SectionUpsert { .. } => "SectionUpsert",
            Command::SectionGet { .. } => "SectionGet",
            Command::SectionGetWorking { .. } => "SectionGetWorking",
            Command::SectionGetVersion { .. } => "SectionGetVersion",
            Command::SectionDelete { .. } => "SectionDelete",
            Command::SectionForceDelete { .. } => "SectionForceDelete",
            Command::SectionHistory { .. } => "SectionHistory",
            Command::SectionKeys => "SectionKeys",
            Command::SectionKeyValues => "SectionKeyValues",
            Command::SectionDestroy => "SectionDestroy",
        }
    }
}
