//! In-memory ingestion store.
//!
//! Holds every accepted ingestion with its ordered batch list for the life of
//! the process. The planner inserts, the batch processor advances batch status,
//! and query handlers read snapshots. Each operation runs under a single lock
//! so readers never observe a batch transition without the matching ingestion
//! status.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SchedulerError;
use crate::status::overall_status;
use crate::types::{BatchId, IngestionId, Priority, Status};

/// A bounded group of ids processed together.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub batch_id: BatchId,
    pub ids: Vec<String>,
    pub status: Status,
    /// Creation time. Only used as queue tie-break information.
    pub created_at: DateTime<Utc>,
}

/// One accepted submission and its batches.
#[derive(Debug, Clone, Serialize)]
pub struct Ingestion {
    pub ingestion_id: IngestionId,
    pub priority: Priority,
    pub status: Status,
    pub batches: Vec<Batch>,
    pub created_at: DateTime<Utc>,
}

impl Ingestion {
    fn recompute_status(&mut self) -> Status {
        self.status = overall_status(self.batches.iter().map(|b| b.status));
        self.status
    }
}

/// Per-batch entry of a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStatus {
    pub batch_id: BatchId,
    pub ids: Vec<String>,
    pub status: Status,
}

/// Response shape of a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionStatus {
    pub ingestion_id: IngestionId,
    pub status: Status,
    pub batches: Vec<BatchStatus>,
}

impl From<&Ingestion> for IngestionStatus {
    fn from(ingestion: &Ingestion) -> Self {
        Self {
            ingestion_id: ingestion.ingestion_id,
            status: ingestion.status,
            batches: ingestion
                .batches
                .iter()
                .map(|b| BatchStatus {
                    batch_id: b.batch_id,
                    ids: b.ids.clone(),
                    status: b.status,
                })
                .collect(),
        }
    }
}

/// Compact listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub ingestion_id: IngestionId,
    pub priority: Priority,
    pub status: Status,
    pub batch_count: usize,
    pub batches_completed: usize,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe handle to the ingestion map. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct IngestionStore {
    inner: Arc<RwLock<HashMap<IngestionId, Ingestion>>>,
}

impl IngestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the map consistent, so a poisoned lock is
    // still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<IngestionId, Ingestion>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<IngestionId, Ingestion>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a fully planned ingestion.
    pub(crate) fn insert(&self, ingestion: Ingestion) {
        self.write().insert(ingestion.ingestion_id, ingestion);
    }

    /// Snapshot of one ingestion's overall and per-batch status.
    pub fn get(&self, ingestion_id: &IngestionId) -> Result<IngestionStatus, SchedulerError> {
        self.read()
            .get(ingestion_id)
            .map(IngestionStatus::from)
            .ok_or(SchedulerError::NotFound(*ingestion_id))
    }

    /// All ingestions, oldest first.
    pub fn list(&self) -> Vec<IngestionSummary> {
        let store = self.read();
        let mut out: Vec<IngestionSummary> = store
            .values()
            .map(|i| IngestionSummary {
                ingestion_id: i.ingestion_id,
                priority: i.priority,
                status: i.status,
                batch_count: i.batches.len(),
                batches_completed: i
                    .batches
                    .iter()
                    .filter(|b| b.status == Status::Completed)
                    .count(),
                created_at: i.created_at,
            })
            .collect();
        out.sort_by_key(|s| s.created_at);
        out
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Move a batch to `triggered` and return its ids for execution.
    pub(crate) fn trigger_batch(
        &self,
        ingestion_id: &IngestionId,
        batch_id: &BatchId,
    ) -> Result<Vec<String>, SchedulerError> {
        let mut store = self.write();
        let (ingestion, idx) = locate(&mut store, ingestion_id, batch_id)?;
        advance(ingestion, idx, Status::Triggered)?;
        Ok(ingestion.batches[idx].ids.clone())
    }

    /// Move a batch to `completed` and return the re-derived ingestion status.
    pub(crate) fn complete_batch(
        &self,
        ingestion_id: &IngestionId,
        batch_id: &BatchId,
    ) -> Result<Status, SchedulerError> {
        let mut store = self.write();
        let (ingestion, idx) = locate(&mut store, ingestion_id, batch_id)?;
        advance(ingestion, idx, Status::Completed)
    }
}

fn locate<'a>(
    store: &'a mut HashMap<IngestionId, Ingestion>,
    ingestion_id: &IngestionId,
    batch_id: &BatchId,
) -> Result<(&'a mut Ingestion, usize), SchedulerError> {
    let ingestion = store
        .get_mut(ingestion_id)
        .ok_or(SchedulerError::NotFound(*ingestion_id))?;
    let idx = ingestion
        .batches
        .iter()
        .position(|b| b.batch_id == *batch_id)
        .ok_or(SchedulerError::BatchNotFound {
            ingestion_id: *ingestion_id,
            batch_id: *batch_id,
        })?;
    Ok((ingestion, idx))
}

/// Apply a forward transition and recompute the ingestion status from scratch.
fn advance(ingestion: &mut Ingestion, idx: usize, next: Status) -> Result<Status, SchedulerError> {
    let batch = &mut ingestion.batches[idx];
    if !batch.status.can_advance_to(next) {
        return Err(SchedulerError::InvalidTransition {
            batch_id: batch.batch_id,
            from: batch.status,
            to: next,
        });
    }
    batch.status = next;
    Ok(ingestion.recompute_status())
}
