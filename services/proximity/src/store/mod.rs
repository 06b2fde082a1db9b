//! Record store abstraction for selections.
//!
//! # Purpose
//! Defines the [`SelectionStore`] trait shared by the in-memory and Postgres
//! backends, the store error type, and the startup helper that opens the
//! configured backend.
//!
//! # Key invariants
//! - At most one selection exists per `user_id`, even under racing writers.
//! - `upsert_selection` is a single atomic operation; callers never perform a
//!   separate lookup before writing.
use crate::config::{ServiceConfig, StorageBackend};
use crate::model::{Selection, Submission, UpsertOutcome};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Insert the submission, or overwrite the existing row with the same `user_id`.
    async fn upsert_selection(&self, submission: Submission) -> StoreResult<UpsertOutcome>;
    async fn get_selection(&self, user_id: &str) -> StoreResult<Selection>;
    async fn list_selections(&self) -> StoreResult<Vec<Selection>>;
    async fn count_selections(&self) -> StoreResult<u64>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected by `config`.
///
/// # Errors
/// - Postgres selected without connection settings.
/// - Connection or migration failures.
pub async fn open_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn SelectionStore>> {
    let store: Arc<dyn SelectionStore> = match config.storage {
        StorageBackend::Memory => Arc::new(memory::InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(postgres::PostgresStore::connect(pg).await?)
        }
    };
    tracing::info!(backend = store.backend_name(), "selection store ready");
    Ok(store)
}
