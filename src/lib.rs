//! SubjectStore - indexed models and versioned sections over a message substrate
//!
//! A model is a log stream whose messages are addressed by subjects of the
//! form `Model.idx1.idx2...`. Rows are the latest message at an address.
//! Sections are keys in a versioned KV bucket.
//!
//! # Quick Start
//!
//! ```ignore
//! use subjectstore::{Command, Executor, Store};
//!
//! let executor = Executor::new(Store::in_memory());
//! executor.execute(Command::ModelCreate { model: "Orders".into(), index_count: Some(2) }).await;
//! let resp = executor.execute(Command::RowFind {
//!     model: "Orders".into(),
//!     indexes: subjectstore::indexes(["7", "PAID"]),
//! }).await;
//! ```
//!
//! # Architecture
//!
//! Commands go through the [`Executor`], which dispatches to the engines
//! bundled in a [`Store`]. Engines talk to substrates only through the
//! [`LogSubstrate`] and [`KvSubstrate`] contracts, so the in-memory
//! substrates can be swapped for a networked implementation.

pub use subjectstore_core::{
    indexes, Ack, BulkRead, Error, IndexValue, Operation, Response, ResponseCode, ResponseValue,
    Result, RowMessage, SectionEntry, SectionPair, SubjectTemplate,
};
pub use subjectstore_engine::{Store, StoreConfig};
pub use subjectstore_executor::{Command, Executor};
pub use subjectstore_substrate::{KvSubstrate, LogSubstrate, MemoryKv, MemoryLog};
