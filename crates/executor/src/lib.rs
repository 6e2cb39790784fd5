//! # SubjectStore Executor
//!
//! Command interface for SubjectStore.
//!
//! This crate turns every store operation into a serializable [`Command`]
//! and runs it through an [`Executor`], which always answers with a flat
//! [`Response`] record. It is the layer SDKs and RPC front-ends talk to.
//!
//! ## Quick Start
//!
//! ```text
//! use subjectstore_executor::{Command, Executor};
//! use subjectstore_engine::Store;
//!
//! let executor = Executor::new(Store::in_memory());
//! executor.execute(Command::ModelCreate { model: "Orders".into(), index_count: Some(2) }).await;
//! let resp = executor.execute(Command::ModelTemplate { model: "Orders".into() }).await;
//! assert_eq!(resp.code.as_u16(), 2023);
//! ```
//!
//! ## Command Groups
//!
//! | Group | Backed by |
//! |-------|-----------|
//! | **Model** | log streams, one per model |
//! | **Row** | subjects inside a model stream |
//! | **Bulk** | row lookups fanned out over many models |
//! | **Section** | a versioned KV bucket |

#![warn(missing_docs)]

mod command;
mod executor;


pub use command::Command;
pub use executor::Executor;
pub use subjectstore_core::{Response, ResponseCode, ResponseValue};
