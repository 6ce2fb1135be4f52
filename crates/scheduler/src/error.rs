//! Scheduler error types.

use thiserror::Error;

use crate::types::{BatchId, IngestionId, Status};

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Malformed or empty submission. Nothing was mutated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ingestion not found: {0}")]
    NotFound(IngestionId),

    #[error("batch {batch_id} not found in ingestion {ingestion_id}")]
    BatchNotFound {
        ingestion_id: IngestionId,
        batch_id: BatchId,
    },

    #[error("batch {batch_id} cannot move from {from} to {to}")]
    InvalidTransition {
        batch_id: BatchId,
        from: Status,
        to: Status,
    },

    #[error("invalid scheduler config: {0}")]
    Config(String),
}

impl SchedulerError {
    /// Errors the caller caused (bad request / unknown id), as opposed to
    /// internal bookkeeping failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SchedulerError::InvalidInput(_) | SchedulerError::NotFound(_))
    }
}
