//! Store Comprehensive Test Suite
//!
//! End-to-end coverage of SubjectStore against the in-memory substrates:
//!
//! - `models`: model lifecycle, templates, last row
//! - `rows`: insert/find/delete/update, enumeration, paging
//! - `bulk`: fan-out reads across models
//! - `sections`: versioned sections and their views
//! - `substrate_faults`: connection loss, payload limits, stream policies
//! - `config`: `subjectstore.toml` driven stores
//! - `executor`: command dispatch over a shared store
//! - `end_to_end`: full Orders and cfg scenarios
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_comprehensive
//!
//! # Sections only
//! cargo test --test store_comprehensive sections::
//!
//! # With log output
//! cargo test --test store_comprehensive -- --nocapture
//! ```

mod common;

mod bulk;
mod config;
mod end_to_end;
mod executor;
mod models;
mod rows;
mod sections;
mod substrate_faults;
