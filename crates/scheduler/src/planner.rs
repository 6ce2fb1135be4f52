//! Ingestion planning: batch partitioning and job submission.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::SchedulerError;
use crate::queue::{Job, PriorityJobQueue};
use crate::store::{Batch, Ingestion, IngestionStore};
use crate::submission::Submission;
use crate::types::{IngestionId, Priority, SchedulerConfig, Status};

/// Split `ids` into consecutive groups of at most `batch_size`, preserving
/// order. A `batch_size` of zero is treated as one.
pub fn partition(ids: &[String], batch_size: usize) -> Vec<Vec<String>> {
    ids.chunks(batch_size.max(1)).map(<[String]>::to_vec).collect()
}

/// Accepts submissions: creates the ingestion record and queues one job per batch.
#[derive(Debug, Clone)]
pub struct IngestionPlanner {
    store: IngestionStore,
    queue: PriorityJobQueue,
    batch_size: usize,
}

impl IngestionPlanner {
    pub fn new(store: IngestionStore, queue: PriorityJobQueue, config: &SchedulerConfig) -> Self {
        Self {
            store,
            queue,
            batch_size: config.batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Plan a validated submission.
    pub fn submit(&self, submission: Submission) -> Result<IngestionId, SchedulerError> {
        let (ids, priority) = submission.into_parts();
        self.plan(ids, priority)
    }

    /// Partition `ids`, store the new ingestion, and enqueue its jobs.
    ///
    /// Validation happens before any mutation; on error neither the store nor
    /// the queue is touched.
    pub fn plan(&self, ids: Vec<String>, priority: Priority) -> Result<IngestionId, SchedulerError> {
        if ids.is_empty() {
            return Err(SchedulerError::InvalidInput("ids must not be empty".into()));
        }

        let ingestion_id = Uuid::new_v4();
        let groups = partition(&ids, self.batch_size);

        let mut batches = Vec::with_capacity(groups.len());
        let mut jobs = Vec::with_capacity(groups.len());
        for group in groups {
            // Stamped in partition order so ties resolve to that order.
            let created = self.queue.stamp();
            let batch = Batch {
                batch_id: Uuid::new_v4(),
                ids: group,
                status: Status::YetToStart,
                created_at: created.at,
            };
            jobs.push(Job {
                ingestion_id,
                batch_id: batch.batch_id,
                priority,
                created,
            });
            batches.push(batch);
        }

        let batch_count = batches.len();
        self.store.insert(Ingestion {
            ingestion_id,
            priority,
            status: Status::YetToStart,
            batches,
            created_at: Utc::now(),
        });
        self.queue.enqueue_all(jobs);

        info!(
            ingestion_id = %ingestion_id,
            priority = %priority,
            ids = ids.len(),
            batches = batch_count,
            "ingestion planned"
        );

        Ok(ingestion_id)
    }
}
