//! Versioned sections
//!
//! Sections are keys in a single KV bucket. Every write is kept as a
//! revision, so a section can be read at its latest state, at its latest
//! live value, or at any retained revision.
//!
//! | View | Returns |
//! |------|---------|
//! | current (`get`) | latest entry, markers included |
//! | working (`get_working`) | latest entry only when it is a put |
//! | versioned (`get_by_version`) | entry at an exact revision |
//! | history (`history`) | every retained entry, oldest first |
//!
//! The bucket handle is bound on first use and shared by all callers
//! until the bucket is destroyed. A cached handle whose bucket was removed
//! elsewhere is dropped and bound again once.

use crate::config::SectionConfig;
use crate::translate::{Target, Translate};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use subjectstore_core::{
    Ack, Error, Operation, Result, SectionEntry, SectionKey, SectionPair,
};
use subjectstore_substrate::{api_codes, KvBucket, KvEntry, KvSubstrate};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Section operations over a lazily bound KV bucket
pub struct SectionEngine {
    kv: Arc<dyn KvSubstrate>,
    config: SectionConfig,
    bucket: RwLock<Option<Arc<dyn KvBucket>>>,
}

impl SectionEngine {
    /// Engine over a KV substrate; no bucket is bound until first use
    pub fn new(kv: Arc<dyn KvSubstrate>, config: SectionConfig) -> Self {
        SectionEngine {
            kv,
            config,
            bucket: RwLock::new(None),
        }
    }

    /// Bucket settings
    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    async fn bucket(&self) -> Result<Arc<dyn KvBucket>> {
        if let Some(bucket) = self.bucket.read().await.as_ref() {
            return Ok(Arc::clone(bucket));
        }
        let mut slot = self.bucket.write().await;
        if let Some(bucket) = slot.as_ref() {
            return Ok(Arc::clone(bucket));
        }
        let bucket = self
            .kv
            .bucket(self.config.bucket_config())
            .await
            .or_translate(Target::Bucket(&self.config.bucket))?;
        debug!(bucket = %self.config.bucket, "section bucket bound");
        *slot = Some(Arc::clone(&bucket));
        Ok(bucket)
    }

    async fn forget(&self, stale: &Arc<dyn KvBucket>) {
        let mut slot = self.bucket.write().await;
        let same = slot
            .as_ref()
            .is_some_and(|bound| Arc::as_ptr(bound).cast::<()>() == Arc::as_ptr(stale).cast::<()>());
        if same {
            *slot = None;
        }
    }

    /// Run the first bucket call of an operation.
    ///
    /// Returns the handle the call succeeded on, for any follow-up calls.
    async fn first_call<T, F, Fut>(
        &self,
        target: Target<'_>,
        call: F,
    ) -> Result<(Arc<dyn KvBucket>, T)>
    where
        F: Fn(Arc<dyn KvBucket>) -> Fut,
        Fut: Future<Output = subjectstore_substrate::Result<T>>,
    {
        let bucket = self.bucket().await?;
        match call(Arc::clone(&bucket)).await {
            Err(err) if err.api_code() == Some(api_codes::STREAM_NOT_FOUND) => {
                debug!(bucket = %self.config.bucket, "section bucket gone, rebinding");
                self.forget(&bucket).await;
                let bucket = self.bucket().await?;
                let value = call(Arc::clone(&bucket)).await.or_translate(target)?;
                Ok((bucket, value))
            }
            result => Ok((bucket, result.or_translate(target)?)),
        }
    }

    fn target<'a>(&'a self, key: &'a SectionKey) -> Target<'a> {
        Target::Section {
            bucket: &self.config.bucket,
            key: key.as_str(),
        }
    }

    fn not_found(key: &SectionKey) -> Error {
        Error::SectionNotFound {
            key: key.as_str().to_string(),
        }
    }

    async fn latest(&self, key: &SectionKey) -> Result<(Arc<dyn KvBucket>, Option<KvEntry>)> {
        let name = key.as_str();
        self.first_call(self.target(key), move |bucket| async move {
            bucket.get(name).await
        })
        .await
    }

    /// Write a section, creating it when no entry exists yet.
    ///
    /// Returns the entry as stored, with its new revision.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn upsert(&self, key: &str, payload: Bytes) -> Result<SectionEntry> {
        let key = SectionKey::new(key)?;
        let target = self.target(&key);
        let (bucket, existing) = self.latest(&key).await?;
        let revision = match existing {
            None => bucket.create(key.as_str(), payload).await,
            Some(_) => bucket.put(key.as_str(), payload).await,
        }
        .or_translate(target)?;
        debug!(key = %key, revision = revision, "section written");
        bucket
            .get(key.as_str())
            .await
            .or_translate(target)?
            .map(to_section)
            .ok_or_else(|| Self::not_found(&key))
    }

    /// Latest entry of a section, delete and purge markers included.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn get(&self, key: &str) -> Result<SectionEntry> {
        let key = SectionKey::new(key)?;
        self.latest(&key)
            .await?
            .1
            .map(to_section)
            .ok_or_else(|| Self::not_found(&key))
    }

    /// Latest entry of a section when it holds a live value.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn get_working(&self, key: &str) -> Result<SectionEntry> {
        let key = SectionKey::new(key)?;
        self.latest(&key)
            .await?
            .1
            .filter(|entry| entry.operation == Operation::Put)
            .map(to_section)
            .ok_or_else(|| Self::not_found(&key))
    }

    /// Entry of a section at an exact revision.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidVersion`] when `version` is zero
    /// - [`Error::SectionNotFound`] when the revision is not retained
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key, version = version))]
    pub async fn get_by_version(&self, key: &str, version: u64) -> Result<SectionEntry> {
        let key = SectionKey::new(key)?;
        if version == 0 {
            return Err(Error::InvalidVersion { version });
        }
        let name = key.as_str();
        self.first_call(self.target(&key), move |bucket| async move {
            bucket.get_revision(name, version).await
        })
        .await?
        .1
        .map(to_section)
            .ok_or_else(|| Self::not_found(&key))
    }

    /// Soft-delete a section, keeping its history.
    ///
    /// A section whose latest entry is already a delete marker is reported
    /// as not found.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn delete(&self, key: &str) -> Result<Ack> {
        let key = SectionKey::new(key)?;
        let target = self.target(&key);
        match self.latest(&key).await? {
            (bucket, Some(entry)) if entry.operation != Operation::Delete => {
                bucket.delete(key.as_str()).await.or_translate(target)?;
                debug!(key = %key, "section deleted");
                Ok(Ack::SectionDeleted)
            }
            _ => Err(Self::not_found(&key)),
        }
    }

    /// Purge a section's history, leaving a purge marker.
    ///
    /// A section whose latest entry is already a purge marker is reported
    /// as not found.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn force_delete(&self, key: &str) -> Result<Ack> {
        let key = SectionKey::new(key)?;
        let target = self.target(&key);
        match self.latest(&key).await? {
            (bucket, Some(entry)) if entry.operation != Operation::Purge => {
                bucket.purge(key.as_str()).await.or_translate(target)?;
                debug!(key = %key, "section purged");
                Ok(Ack::SectionPurged)
            }
            _ => Err(Self::not_found(&key)),
        }
    }

    /// Retained entries of a section, oldest first.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn history(&self, key: &str) -> Result<Vec<SectionEntry>> {
        let key = SectionKey::new(key)?;
        let name = key.as_str();
        let (_, entries) = self
            .first_call(self.target(&key), move |bucket| async move {
                bucket.history(name).await
            })
            .await?;
        if entries.is_empty() {
            return Err(Self::not_found(&key));
        }
        Ok(entries.into_iter().map(to_section).collect())
    }

    /// Keys of all sections holding a live value.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let (_, keys) = self
            .first_call(Target::Bucket(&self.config.bucket), |bucket| async move {
                bucket.keys().await
            })
            .await?;
        if keys.is_empty() {
            return Err(Error::RowsNotFound {
                filter: self.config.bucket.clone(),
            });
        }
        Ok(keys)
    }

    /// Every live section with its working value.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn list_key_values(&self) -> Result<Vec<SectionPair>> {
        let (bucket, keys) = self
            .first_call(Target::Bucket(&self.config.bucket), |bucket| async move {
                bucket.keys().await
            })
            .await?;
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            let entry = bucket.get(&key).await.or_translate(Target::Section {
                bucket: &self.config.bucket,
                key: &key,
            })?;
            if let Some(entry) = entry.filter(|e| e.operation == Operation::Put) {
                pairs.push(SectionPair {
                    key,
                    payload: entry.value,
                });
            }
        }
        if pairs.is_empty() {
            return Err(Error::RowsNotFound {
                filter: self.config.bucket.clone(),
            });
        }
        Ok(pairs)
    }

    /// Remove the bucket with every section in it.
    ///
    /// The next operation binds a fresh, empty bucket.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn destroy(&self) -> Result<Ack> {
        self.first_call(Target::Bucket(&self.config.bucket), |bucket| async move {
            bucket.destroy().await
        })
        .await?;
        *self.bucket.write().await = None;
        info!(bucket = %self.config.bucket, "section bucket destroyed");
        Ok(Ack::SectionsDestroyed)
    }
}

fn to_section(entry: KvEntry) -> SectionEntry {
    SectionEntry {
        key: entry.key,
        payload: entry.value,
        revision: entry.revision,
        created: entry.created,
        operation: entry.operation,
    }
}
