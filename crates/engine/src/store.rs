//! Store facade
//!
//! [`Store`] wires the engines to one log substrate, one KV substrate and
//! one immutable [`StoreConfig`]. Clones share the same substrates and the
//! same section bucket handle.

use crate::bulk::BulkReader;
use crate::config::{ConfigResult, StoreConfig};
use crate::model::ModelManager;
use crate::row::RowEngine;
use crate::section::SectionEngine;
use std::path::Path;
use std::sync::Arc;
use subjectstore_substrate::{KvSubstrate, LogSubstrate, MemoryKv, MemoryLog};
use tracing::info;

/// Entry point bundling every engine
#[derive(Clone)]
pub struct Store {
    config: Arc<StoreConfig>,
    models: ModelManager,
    rows: RowEngine,
    bulk: BulkReader,
    sections: Arc<SectionEngine>,
}

impl Store {
    /// Store over the given substrates
    pub fn new(
        log: Arc<dyn LogSubstrate>,
        kv: Arc<dyn KvSubstrate>,
        config: StoreConfig,
    ) -> Self {
        let models = ModelManager::new(Arc::clone(&log), config.model.clone());
        let rows = RowEngine::new(log);
        let bulk = BulkReader::new(rows.clone());
        let sections = Arc::new(SectionEngine::new(kv, config.sections.clone()));
        info!(bucket = %config.sections.bucket, "store ready");
        Store {
            config: Arc::new(config),
            models,
            rows,
            bulk,
            sections,
        }
    }

    /// Store over fresh in-memory substrates with default config
    pub fn in_memory() -> Self {
        Self::in_memory_with(StoreConfig::default())
    }

    /// Store over fresh in-memory substrates
    pub fn in_memory_with(config: StoreConfig) -> Self {
        Self::new(Arc::new(MemoryLog::new()), Arc::new(MemoryKv::new()), config)
    }

    /// Store over the given substrates, configured from a `subjectstore.toml`.
    ///
    /// The file is created with default contents when missing.
    pub fn open(
        log: Arc<dyn LogSubstrate>,
        kv: Arc<dyn KvSubstrate>,
        config_path: &Path,
    ) -> ConfigResult<Self> {
        StoreConfig::write_default_if_missing(config_path)?;
        let config = StoreConfig::from_file(config_path)?;
        Ok(Self::new(log, kv, config))
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Model lifecycle operations
    pub fn models(&self) -> &ModelManager {
        &self.models
    }

    /// Row operations
    pub fn rows(&self) -> &RowEngine {
        &self.rows
    }

    /// Bulk reads
    pub fn bulk(&self) -> &BulkReader {
        &self.bulk
    }

    /// Section operations
    pub fn sections(&self) -> &SectionEngine {
        &self.sections
    }
}
