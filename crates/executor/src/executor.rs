//! The Executor - single entry point to SubjectStore's engines.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! corresponding engine operation and flattens the outcome into a
//! [`Response`]. It never returns a bare error: failures become responses
//! carrying the error's code and text.

use crate::Command;
use subjectstore_core::{Error, Response, ResponseCode, ResponseValue};
use subjectstore_engine::Store;
use tracing::debug;

/// The command executor - single entry point for all store operations.
///
/// # Example
///
/// ```
/// use subjectstore_executor::{Command, Executor};
/// use subjectstore_engine::Store;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let executor = Executor::new(Store::in_memory());
///     let resp = executor
///         .execute(Command::ModelCreate { model: "Orders".into(), index_count: Some(2) })
///         .await;
///     assert_eq!(resp.code.as_u16(), 2001);
/// });
/// ```
#[derive(Clone)]
pub struct Executor {
    store: Store,
}

impl Executor {
    /// Create a new executor over a store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Execute a single command.
    pub async fn execute(&self, cmd: Command) -> Response {
        let name = cmd.name();
        let resp = self.dispatch(cmd).await;
        debug!(command = name, code = resp.code.as_u16(), "command executed");
        resp
    }

    /// Execute commands in order, one response per command.
    pub async fn execute_many(&self, cmds: Vec<Command>) -> Vec<Response> {
        let mut responses = Vec::with_capacity(cmds.len());
        for cmd in cmds {
            responses.push(self.execute(cmd).await);
        }
        responses
    }

    /// Underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn dispatch(&self, cmd: Command) -> Response {
        let models = self.store.models();
        let rows = self.store.rows();
        let sections = self.store.sections();

        match cmd {
            // Model commands
            Command::ModelCreate { model, index_count } => Response::from_result(match index_count {
                Some(count) => models.create(&model, count).await,
                None => models.create_with_defaults(&model).await,
            }),
            Command::ModelUpdate { model, index_count } => Response::from_result(match index_count {
                Some(count) => models.update(&model, count).await,
                None => models.update_with_defaults(&model).await,
            }),
            Command::ModelDrop { model } => Response::from_result(models.drop(&model).await),
            Command::ModelExists { model } => match models.exists(&model).await {
                Ok(true) => Response::code(ResponseCode::ModelFound),
                Ok(false) => Response::from_error(&Error::ModelNotFound { model }),
                Err(err) => Response::from_error(&err),
            },
            Command::ModelTemplate { model } => {
                Response::from_result(models.describe_template(&model).await)
            }
            Command::ModelLastRow { model } => match models.last_row(&model).await {
                Ok(row) => Response::code(ResponseCode::KeyFound)
                    .with_payload(ResponseValue::Subject(row.subject))
                    .with_position(row.position),
                Err(err) => Response::from_error(&err),
            },

            // Row commands
            Command::RowFind { model, indexes } => {
                Response::from_result(rows.find(&model, &indexes).await)
            }
            Command::RowInsert {
                model,
                payload,
                indexes,
            } => Response::from_result(rows.insert(&model, payload, &indexes).await),
            Command::RowDelete { model, indexes } => {
                Response::from_result(rows.delete(&model, &indexes).await)
            }
            Command::RowUpdate {
                model,
                payload,
                indexes,
            } => Response::from_result(rows.update(&model, payload, &indexes).await),
            Command::RowEnumerate { model, prefix } => {
                Response::from_result(rows.enumerate(&model, &prefix).await)
            }
            Command::RowPage {
                model,
                page,
                page_size,
            } => Response::from_result(rows.page(&model, page, page_size).await),

            // Bulk commands
            Command::BulkRead { addresses } => {
                Response::from_result(self.store.bulk().read_many(&addresses).await)
            }

            // Section commands
            Command::SectionUpsert { key, payload } => {
                Response::from_result(sections.upsert(&key, payload).await)
            }
            Command::SectionGet { key } => Response::from_result(sections.get(&key).await),
            Command::SectionGetWorking { key } => {
                Response::from_result(sections.get_working(&key).await)
            }
            Command::SectionGetVersion { key, version } => {
                Response::from_result(sections.get_by_version(&key, version).await)
            }
            Command::SectionDelete { key } => Response::from_result(sections.delete(&key).await),
            Command::SectionForceDelete { key } => {
                Response::from_result(sections.force_delete(&key).await)
            }
            Command::SectionHistory { key } => {
                Response::from_result(sections.history(&key).await)
            }
            Command::SectionKeys => Response::from_result(sections.list_keys().await),
            Command::SectionKeyValues => Response::from_result(sections.list_key_values().await),
            Command::SectionDestroy => Response::from_result(sections.destroy().await),
        }
    }
}
