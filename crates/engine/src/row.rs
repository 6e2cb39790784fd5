//! Row engine
//!
//! Rows live in their model's stream at the subject built from the model
//! name and the row's index values. All row operations go through log
//! primitives only:
//!
//! | Operation | Log calls |
//! |-----------|-----------|
//! | `find` | last message by subject |
//! | `insert` | `find`, then publish |
//! | `delete` | `find`, then delete by sequence |
//! | `update` | `delete`, then `insert` |
//! | `enumerate` | stream info with a subjects filter |
//! | `page` | stream info, then get by sequence |
//!
//! Writes reject addresses holding a wildcard token before touching the
//! stream, so a rejected update never deletes anything.
//!
//! Insert's existence check and update's delete + insert are separate
//! round trips; two writers racing on one address can both pass the check.

use crate::model::template_of;
use crate::translate::{Target, Translate};
use bytes::Bytes;
use std::sync::Arc;
use subjectstore_core::subject::{encode_address, is_pattern};
use subjectstore_core::{Ack, Error, IndexValue, ModelName, Result, RowMessage, SubjectTemplate};
use subjectstore_substrate::{LogSubstrate, MessageQuery, StoredMessage};
use tracing::{debug, warn};

/// Row-level operations over model streams
#[derive(Clone)]
pub struct RowEngine {
    log: Arc<dyn LogSubstrate>,
}

/// A validated row address together with its model
struct Resolved {
    model: ModelName,
    address: String,
}

impl Resolved {
    fn new(model: &str, indexes: &[IndexValue]) -> Result<Self> {
        let model = ModelName::new(model)?;
        let address = encode_address(model.as_str(), indexes);
        Ok(Resolved { model, address })
    }

    /// Reject addresses that would publish to a pattern.
    ///
    /// Covers explicit wildcards as well as literal `*` / `>` values.
    fn writable(self) -> Result<Self> {
        if is_pattern(&self.address) {
            return Err(Error::BadRequest {
                reason: format!("wildcard index values cannot be written: {}", self.address),
            });
        }
        Ok(self)
    }

    fn target(&self) -> Target<'_> {
        Target::Row {
            model: self.model.as_str(),
            address: &self.address,
        }
    }
}

impl RowEngine {
    /// Engine over a log substrate
    pub fn new(log: Arc<dyn LogSubstrate>) -> Self {
        RowEngine { log }
    }

    async fn check_shape(&self, row: &Resolved) -> Result<()> {
        let template: SubjectTemplate = template_of(self.log.as_ref(), &row.model).await?;
        template.check_cardinality(&row.address)
    }

    async fn resolve(&self, model: &str, indexes: &[IndexValue]) -> Result<Resolved> {
        let row = Resolved::new(model, indexes)?;
        self.check_shape(&row).await?;
        Ok(row)
    }

    async fn resolve_writable(&self, model: &str, indexes: &[IndexValue]) -> Result<Resolved> {
        let row = Resolved::new(model, indexes)?.writable()?;
        self.check_shape(&row).await?;
        Ok(row)
    }

    async fn locate(&self, row: &Resolved) -> Result<RowMessage> {
        let msg = self
            .log
            .get_message(
                row.model.as_str(),
                MessageQuery::LastBySubject(row.address.clone()),
            )
            .await
            .or_translate(row.target())?;
        Ok(to_row(msg))
    }

    /// Most recent message at a row address.
    ///
    /// Wildcard index values match any segment at their position.
    ///
    /// # Errors
    ///
    /// - [`Error::ModelNotFound`] when the model is not registered
    /// - [`Error::CardinalityMismatch`] when the address has the wrong shape
    /// - [`Error::NoMessageFound`] when nothing is stored at the address
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn find(&self, model: &str, indexes: &[IndexValue]) -> Result<RowMessage> {
        let row = self.resolve(model, indexes).await?;
        debug!(address = %row.address, "find row");
        self.locate(&row).await
    }

    /// Append a row that does not exist yet.
    ///
    /// # Errors
    ///
    /// - [`Error::RowExists`] when a message is already stored at the address
    /// - [`Error::BadRequest`] when an index value is a wildcard
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn insert(&self, model: &str, payload: Bytes, indexes: &[IndexValue]) -> Result<Ack> {
        let row = self.resolve_writable(model, indexes).await?;
        self.write(row, payload).await
    }

    async fn write(&self, row: Resolved, payload: Bytes) -> Result<Ack> {
        debug!(address = %row.address, size = payload.len(), "insert row");
        match self.locate(&row).await {
            Ok(_) => {
                return Err(Error::RowExists {
                    address: row.address,
                })
            }
            Err(Error::NoMessageFound { .. }) => {}
            Err(err) => return Err(err),
        }
        self.log
            .publish(&row.address, payload)
            .await
            .or_translate(row.target())?;
        Ok(Ack::RowInserted)
    }

    /// Remove the most recent message at a row address.
    ///
    /// A wildcard address removes the newest matching row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowNotDeleted`] when the substrate refuses the removal,
    /// or any [`find`](Self::find) failure.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn delete(&self, model: &str, indexes: &[IndexValue]) -> Result<Ack> {
        let row = self.resolve(model, indexes).await?;
        self.remove(&row).await
    }

    async fn remove(&self, row: &Resolved) -> Result<Ack> {
        debug!(address = %row.address, "delete row");
        let found = self.locate(row).await?;
        let removed = self
            .log
            .delete_message(row.model.as_str(), found.position)
            .await
            .or_translate(row.target())?;
        if !removed {
            warn!(address = %row.address, position = found.position, "row delete rejected");
            return Err(Error::RowNotDeleted {
                address: row.address.clone(),
            });
        }
        Ok(Ack::RowDeleted)
    }

    /// Replace a row: delete, then insert.
    ///
    /// The address is validated before the delete runs. Stops at the first
    /// failing step and returns its error.
    ///
    /// # Errors
    ///
    /// - [`Error::BadRequest`] when an index value is a wildcard
    /// - any [`delete`](Self::delete) or [`insert`](Self::insert) failure
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn update(&self, model: &str, payload: Bytes, indexes: &[IndexValue]) -> Result<Ack> {
        let row = self.resolve_writable(model, indexes).await?;
        self.remove(&row).await?;
        self.write(row, payload).await?;
        Ok(Ack::RowUpdated)
    }

    /// Live subjects of a model matching a prefix of index values.
    ///
    /// Positions past the prefix, and explicit wildcards inside it, match
    /// any segment. Subjects are ordered by their first stored sequence.
    ///
    /// # Errors
    ///
    /// - [`Error::CardinalityMismatch`] when the prefix is longer than the
    ///   model's index count
    /// - [`Error::RowsNotFound`] when nothing matches
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model))]
    pub async fn enumerate(&self, model: &str, prefix: &[IndexValue]) -> Result<Vec<String>> {
        let name = ModelName::new(model)?;
        let template = template_of(self.log.as_ref(), &name).await?;
        let filter = template.mask(prefix)?;
        debug!(filter = %filter, "enumerate rows");
        let info = self
            .log
            .stream_info(name.as_str(), Some(&filter))
            .await
            .or_translate(Target::Model(name.as_str()))?;
        match info.state.subjects {
            Some(subjects) => Ok(subjects.into_iter().map(|s| s.subject).collect()),
            None => Err(Error::RowsNotFound { filter }),
        }
    }

    /// One page of a model's stored messages in sequence order.
    ///
    /// `page` is 1-based. Messages are fetched one sequence at a time from
    /// the first stored sequence, so deleted gaps before the page still cost
    /// a round trip each. The scan stops once every live message is seen.
    ///
    /// # Errors
    ///
    /// - [`Error::BadRequest`] when `page` or `page_size` is zero
    /// - [`Error::RowsNotFound`] when the page is empty
    #[tracing::instrument(level = "debug", skip_all, fields(model = %model, page = page, page_size = page_size))]
    pub async fn page(&self, model: &str, page: usize, page_size: usize) -> Result<Vec<RowMessage>> {
        if page == 0 || page_size == 0 {
            return Err(Error::BadRequest {
                reason: format!("page {page} of size {page_size}: both must be at least 1"),
            });
        }
        let name = ModelName::new(model)?;
        let target = Target::Model(name.as_str());
        let info = self
            .log
            .stream_info(name.as_str(), None)
            .await
            .or_translate(target)?;

        let mut skip = (page - 1).saturating_mul(page_size);
        let mut rows = Vec::with_capacity(page_size);
        let mut seen = 0u64;
        if info.state.messages > 0 {
            for seq in info.state.first_seq..=info.state.last_seq {
                if rows.len() == page_size || seen == info.state.messages {
                    break;
                }
                let msg = match self
                    .log
                    .get_message(name.as_str(), MessageQuery::Sequence(seq))
                    .await
                    .or_translate(target)
                {
                    Ok(msg) => msg,
                    Err(Error::NoMessageFound { .. }) => continue,
                    Err(err) => return Err(err),
                };
                seen += 1;
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                rows.push(to_row(msg));
            }
        }
        if rows.is_empty() {
            return Err(Error::RowsNotFound {
                filter: format!("{name} page {page}"),
            });
        }
        Ok(rows)
    }
}

fn to_row(msg: StoredMessage) -> RowMessage {
    RowMessage {
        subject: msg.subject,
        payload: msg.payload,
        position: msg.sequence,
        time: msg.time,
    }
}
