//! Engines for SubjectStore
//!
//! This crate implements the store on top of the substrate contracts:
//! - ModelManager: model lifecycle over log streams
//! - RowEngine: indexed rows as subjects inside a model stream
//! - BulkReader: fan-out reads across models
//! - SectionEngine: versioned key/value sections over a KV bucket
//! - Store: facade wiring the engines to substrates and configuration
//!
//! Every substrate failure is translated into the core error taxonomy
//! before it leaves this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bulk;
pub mod config;
pub mod model;
pub mod row;
pub mod section;
pub mod store;
pub mod translate;

pub use bulk::BulkReader;
pub use config::{
    ConfigError, ConfigResult, ModelDefaults, SectionConfig, StoreConfig, CONFIG_FILE_NAME,
};
pub use model::ModelManager;
pub use row::RowEngine;
pub use section::SectionEngine;
pub use store::Store;
pub use translate::{translate, Target};
