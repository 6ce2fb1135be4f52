use std::sync::PoisonError;

use futures::future::join_all;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::metrics::ProcessorMetrics;
use crate::queue::Job;
use crate::types::{BatchId, IngestionId, Status};

use super::BatchProcessor;

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Queue was empty.
    Idle,
    /// One batch ran to completion.
    Processed {
        ingestion_id: IngestionId,
        batch_id: BatchId,
        ingestion_status: Status,
    },
    /// The popped job could not be advanced and was dropped.
    Skipped {
        ingestion_id: IngestionId,
        batch_id: BatchId,
    },
}

impl BatchProcessor {
    /// Run one tick: pop at most one job and process its batch.
    pub async fn tick(&self) -> TickOutcome {
        match self.queue.pop_front() {
            Some(job) => self.process_job(job).await,
            None => {
                debug!("tick: queue empty");
                self.with_metrics(|m| m.record_idle_tick());
                TickOutcome::Idle
            }
        }
    }

    async fn process_job(&self, job: Job) -> TickOutcome {
        let Job {
            ingestion_id,
            batch_id,
            priority,
            ..
        } = job;

        let ids = match self.store.trigger_batch(&ingestion_id, &batch_id) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(ingestion_id = %ingestion_id, batch_id = %batch_id, error = %e, "dropping job");
                self.with_metrics(|m| m.record_skipped());
                return TickOutcome::Skipped { ingestion_id, batch_id };
            }
        };

        info!(
            ingestion_id = %ingestion_id,
            batch_id = %batch_id,
            priority = %priority,
            ids = ids.len(),
            "batch triggered"
        );

        let start = Instant::now();
        let outcomes = join_all(ids.iter().map(|id| self.work.fetch(id))).await;
        let elapsed = start.elapsed();

        match self.store.complete_batch(&ingestion_id, &batch_id) {
            Ok(ingestion_status) => {
                info!(
                    ingestion_id = %ingestion_id,
                    batch_id = %batch_id,
                    fetched = outcomes.len(),
                    duration_ms = elapsed.as_millis() as u64,
                    ingestion_status = %ingestion_status,
                    "batch completed"
                );
                self.with_metrics(|m| m.record_batch(priority, outcomes.len(), elapsed));
                TickOutcome::Processed {
                    ingestion_id,
                    batch_id,
                    ingestion_status,
                }
            }
            Err(e) => {
                warn!(ingestion_id = %ingestion_id, batch_id = %batch_id, error = %e, "failed to complete batch");
                self.with_metrics(|m| m.record_skipped());
                TickOutcome::Skipped { ingestion_id, batch_id }
            }
        }
    }

    /// Run the fixed-interval loop until [`shutdown`](Self::shutdown) is called.
    ///
    /// The first tick fires immediately. A tick that overruns the interval
    /// pushes the following ticks back rather than bursting to catch up.
    pub async fn run(&self) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            unit_of_work = self.work.name(),
            "batch processor started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.is_shutdown() {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.wake.notified() => continue,
            }
            if self.is_shutdown() {
                break;
            }
            self.tick().await;
        }

        info!("batch processor stopped");
    }

    fn with_metrics(&self, f: impl FnOnce(&mut ProcessorMetrics)) {
        let mut m = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *m);
    }
}
