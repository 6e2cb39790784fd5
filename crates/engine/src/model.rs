//! Model lifecycle
//!
//! A model is a log stream named after the model whose subject template is
//! the model name followed by one wildcard segment per index. Creating,
//! updating and dropping a model creates, reconfigures and deletes that
//! stream.

use crate::config::ModelDefaults;
use crate::translate::{Target, Translate};
use std::sync::Arc;
use subjectstore_core::subject::{DELIMITER, FULL_WILDCARD};
use subjectstore_core::{Ack, Error, ModelName, Result, RowMessage, SubjectTemplate};
use subjectstore_substrate::{api_codes, LogSubstrate, MessageQuery};
use tracing::{debug, info};

/// Creates, updates, drops and describes models
#[derive(Clone)]
pub struct ModelManager {
    log: Arc<dyn LogSubstrate>,
    defaults: ModelDefaults,
}

impl ModelManager {
    /// Manager over a log substrate with fixed stream defaults
    pub fn new(log: Arc<dyn LogSubstrate>, defaults: ModelDefaults) -> Self {
        ModelManager { log, defaults }
    }

    /// Stream defaults applied to new models
    pub fn defaults(&self) -> &ModelDefaults {
        &self.defaults
    }

    /// Register a model with `index_count` index columns.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidModelName`] / [`Error::InvalidIndexCount`] on bad input
    /// - [`Error::ModelExists`] when the model is already registered, whatever
    ///   its index count
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name, index_count = index_count))]
    pub async fn create(&self, name: &str, index_count: usize) -> Result<Ack> {
        let model = ModelName::new(name)?;
        let template = SubjectTemplate::for_model(&model, index_count)?;
        if self.registered(&model).await? {
            return Err(Error::ModelExists {
                model: model.into_inner(),
            });
        }
        self.log
            .create_stream(self.defaults.stream_config(&model, &template))
            .await
            .or_translate(Target::Model(model.as_str()))?;
        info!(model = %model, template = %template, "model created");
        Ok(Ack::ModelCreated)
    }

    /// [`create`](Self::create) with the configured default index count.
    pub async fn create_with_defaults(&self, name: &str) -> Result<Ack> {
        self.create(name, self.defaults.create_index_count).await
    }

    /// Replace a model's template with one of `index_count` indexes.
    ///
    /// Existing rows are not migrated.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name, index_count = index_count))]
    pub async fn update(&self, name: &str, index_count: usize) -> Result<Ack> {
        let model = ModelName::new(name)?;
        let template = SubjectTemplate::for_model(&model, index_count)?;
        if !self.registered(&model).await? {
            return Err(Error::ModelNotFound {
                model: model.into_inner(),
            });
        }
        self.log
            .update_stream(self.defaults.stream_config(&model, &template))
            .await
            .or_translate(Target::Model(model.as_str()))?;
        info!(model = %model, template = %template, "model updated");
        Ok(Ack::ModelUpdated)
    }

    /// [`update`](Self::update) with the configured default index count.
    pub async fn update_with_defaults(&self, name: &str) -> Result<Ack> {
        self.update(name, self.defaults.update_index_count).await
    }

    /// Remove a model and all its rows.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name))]
    pub async fn drop(&self, name: &str) -> Result<Ack> {
        let model = ModelName::new(name)?;
        self.log
            .delete_stream(model.as_str())
            .await
            .or_translate(Target::Model(model.as_str()))?;
        info!(model = %model, "model dropped");
        Ok(Ack::ModelDropped)
    }

    /// Registered subject template of a model.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name))]
    pub async fn describe_template(&self, name: &str) -> Result<SubjectTemplate> {
        let model = ModelName::new(name)?;
        template_of(self.log.as_ref(), &model).await
    }

    /// Whether a model is registered.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name))]
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let model = ModelName::new(name)?;
        self.registered(&model).await
    }

    /// Most recent message stored in a model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowsNotFound`] when the model holds no messages.
    #[tracing::instrument(level = "debug", skip_all, fields(model = %name))]
    pub async fn last_row(&self, name: &str) -> Result<RowMessage> {
        let model = ModelName::new(name)?;
        let target = Target::Model(model.as_str());
        let info = self
            .log
            .stream_info(model.as_str(), None)
            .await
            .or_translate(target)?;
        if info.state.messages == 0 {
            return Err(Error::RowsNotFound {
                filter: model.as_str().to_string(),
            });
        }
        let every_row = format!("{}{}{}", model, DELIMITER, FULL_WILDCARD);
        let msg = self
            .log
            .get_message(model.as_str(), MessageQuery::LastBySubject(every_row))
            .await
            .or_translate(target)?;
        debug!(model = %model, subject = %msg.subject, position = msg.sequence, "last row");
        Ok(RowMessage {
            subject: msg.subject,
            payload: msg.payload,
            position: msg.sequence,
            time: msg.time,
        })
    }

    async fn registered(&self, model: &ModelName) -> Result<bool> {
        match self.log.stream_info(model.as_str(), None).await {
            Ok(_) => Ok(true),
            Err(err) if err.api_code() == Some(api_codes::STREAM_NOT_FOUND) => Ok(false),
            Err(err) => Err(crate::translate::translate(err, Target::Model(model.as_str()))),
        }
    }
}

/// Look up the registered template of a model's stream.
///
/// A stream without subjects is reported as a missing model.
pub(crate) async fn template_of(log: &dyn LogSubstrate, model: &ModelName) -> Result<SubjectTemplate> {
    let info = log
        .stream_info(model.as_str(), None)
        .await
        .or_translate(Target::Model(model.as_str()))?;
    info.config
        .subjects
        .into_iter()
        .next()
        .map(SubjectTemplate::from_raw)
        .ok_or_else(|| Error::ModelNotFound {
            model: model.as_str().to_string(),
        })
}
