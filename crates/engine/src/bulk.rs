//! Bulk fan-out reads across models

use crate::row::RowEngine;
use subjectstore_core::subject::split_address;
use subjectstore_core::{BulkRead, Error, FoundRow, IndexValue, MissingRow, Result};
use tracing::debug;

/// Resolves many fully-qualified row addresses in one call
#[derive(Clone)]
pub struct BulkReader {
    rows: RowEngine,
}

impl BulkReader {
    /// Reader resolving addresses through a row engine
    pub fn new(rows: RowEngine) -> Self {
        BulkReader { rows }
    }

    /// Look up every address, partitioning into found and missing.
    ///
    /// The leading segment of each address names the model. A failing
    /// address never stops the others from being processed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAddressList`] when `addresses` is empty.
    #[tracing::instrument(level = "debug", skip_all, fields(count = addresses.len()))]
    pub async fn read_many<S: AsRef<str>>(&self, addresses: &[S]) -> Result<BulkRead> {
        if addresses.is_empty() {
            return Err(Error::EmptyAddressList);
        }
        let mut read = BulkRead::default();
        for address in addresses {
            let address = address.as_ref();
            let (model, segments) = split_address(address);
            let indexes: Vec<IndexValue> = segments.into_iter().map(IndexValue::Value).collect();
            match self.rows.find(&model, &indexes).await {
                Ok(row) => read.found.push(FoundRow {
                    address: address.to_string(),
                    payload: row.payload,
                    position: row.position,
                }),
                Err(err) => {
                    debug!(address = %address, error = %err, "bulk read miss");
                    read.missing.push(MissingRow {
                        address: address.to_string(),
                        code: err.code(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(read)
    }
}
