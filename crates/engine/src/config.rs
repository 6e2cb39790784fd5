//! Store configuration via `subjectstore.toml`
//!
//! Configuration is an immutable value read once and handed to the engines
//! at construction. On first start a commented default file can be written
//! next to the application; edit it and restart to change settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use subjectstore_core::{ModelName, SubjectTemplate};
use subjectstore_substrate::{
    BucketConfig, DiscardPolicy, RetentionPolicy, StorageType, StreamConfig,
};
use thiserror::Error;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "subjectstore.toml";

/// Failures while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// File could not be written
    #[error("failed to write config file '{}': {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Stream settings applied to every model, plus default index counts.
///
/// Limits of `0` mean unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    /// Stream storage backend
    pub storage: StorageType,
    /// Stream retention policy
    pub retention: RetentionPolicy,
    /// Stream discard policy
    pub discard: DiscardPolicy,
    /// Maximum bytes per model stream
    pub max_bytes: u64,
    /// Maximum message age in seconds
    pub max_age_secs: u64,
    /// Maximum messages per model stream
    pub max_msgs: u64,
    /// Maximum size of one row payload
    pub max_msg_size: u64,
    /// Maximum messages retained per row address
    pub max_msgs_per_subject: u64,
    /// Replica count
    pub replicas: usize,
    /// Reject row deletion at the stream level
    pub deny_delete: bool,
    /// Reject stream purges
    pub deny_purge: bool,
    /// Duplicate-detection window in seconds
    pub duplicate_window_secs: u64,
    /// Index count used by `create_with_defaults`
    pub create_index_count: usize,
    /// Index count used by `update_with_defaults`
    pub update_index_count: usize,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        let stream = StreamConfig::default();
        ModelDefaults {
            storage: stream.storage,
            retention: stream.retention,
            discard: stream.discard,
            max_bytes: stream.max_bytes,
            max_age_secs: stream.max_age_secs,
            max_msgs: stream.max_messages,
            max_msg_size: stream.max_message_size,
            max_msgs_per_subject: stream.max_messages_per_subject,
            replicas: stream.num_replicas,
            deny_delete: stream.deny_delete,
            deny_purge: stream.deny_purge,
            duplicate_window_secs: stream.duplicate_window_secs,
            create_index_count: 15,
            update_index_count: 1,
        }
    }
}

impl ModelDefaults {
    /// Stream config for a model with the given template
    pub fn stream_config(&self, model: &ModelName, template: &SubjectTemplate) -> StreamConfig {
        StreamConfig {
            name: model.as_str().to_string(),
            subjects: vec![template.as_str().to_string()],
            storage: self.storage,
            retention: self.retention,
            discard: self.discard,
            max_bytes: self.max_bytes,
            max_age_secs: self.max_age_secs,
            max_messages: self.max_msgs,
            max_message_size: self.max_msg_size,
            max_messages_per_subject: self.max_msgs_per_subject,
            num_replicas: self.replicas,
            deny_delete: self.deny_delete,
            deny_purge: self.deny_purge,
            duplicate_window_secs: self.duplicate_window_secs,
        }
    }
}

/// Settings of the section bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Bucket name
    pub bucket: String,
    /// Revisions retained per key, `0` for unbounded
    pub max_history: usize,
    /// Bucket storage backend
    pub storage: StorageType,
}

impl Default for SectionConfig {
    fn default() -> Self {
        SectionConfig {
            bucket: "Sections".to_string(),
            max_history: 0,
            storage: StorageType::File,
        }
    }
}

impl SectionConfig {
    /// Bucket config handed to the KV substrate
    pub fn bucket_config(&self) -> BucketConfig {
        BucketConfig {
            bucket: self.bucket.clone(),
            history: self.max_history,
            storage: self.storage,
        }
    }
}

/// Store configuration loaded from `subjectstore.toml`.
///
/// # Example
///
/// ```toml
/// [model]
/// storage = "file"
/// max_bytes = 104857600
/// create_index_count = 15
///
/// [sections]
/// bucket = "Sections"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Model stream defaults
    pub model: ModelDefaults,
    /// Section bucket settings
    pub sections: SectionConfig,
}

impl StoreConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# SubjectStore configuration

[model]
# Stream storage: "file" (default) or "memory"
storage = "file"
# Retention: "limits" (default), "interest" or "workqueue"
retention = "limits"
# Discard when a limit is hit: "old" (default) or "new"
discard = "old"
# Limits, 0 = unlimited
max_bytes = 104857600
max_age_secs = 0
max_msgs = 0
max_msg_size = 0
max_msgs_per_subject = 0
replicas = 1
deny_delete = false
deny_purge = false
duplicate_window_secs = 0
# Index counts used when a model is created or updated without one
create_index_count = 15
update_index_count = 1

[sections]
bucket = "Sections"
# Revisions kept per section, 0 = unbounded
max_history = 0
storage = "file"
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or a value is out of range.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: StoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is
    /// out of range.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> ConfigResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.create_index_count == 0 {
            return Err(ConfigError::Invalid {
                field: "model.create_index_count",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.model.update_index_count == 0 {
            return Err(ConfigError::Invalid {
                field: "model.update_index_count",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.sections.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sections.bucket",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
