use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Priority;

/// Batch processor operational metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessorMetrics {
    /// Ticks observed, including idle ones.
    pub ticks: u64,
    /// Ticks that found the queue empty.
    pub idle_ticks: u64,
    /// Batches that reached `completed`.
    pub batches_completed: u64,
    /// Jobs dropped because their batch could not be advanced.
    pub jobs_skipped: u64,
    /// Ids processed across all batches.
    pub ids_processed: u64,
    /// Completed batches per priority.
    pub completed_by_priority: HashMap<Priority, u64>,
    /// Rolling mean of batch execution time.
    pub avg_batch_duration: Duration,
    /// When the last batch completed.
    pub last_batch_at: Option<DateTime<Utc>>,
}

impl ProcessorMetrics {
    pub fn record_idle_tick(&mut self) {
        self.ticks += 1;
        self.idle_ticks += 1;
    }

    pub fn record_skipped(&mut self) {
        self.ticks += 1;
        self.jobs_skipped += 1;
    }

    /// Record a completed batch.
    pub fn record_batch(&mut self, priority: Priority, ids: usize, duration: Duration) {
        self.ticks += 1;
        self.batches_completed += 1;
        self.ids_processed += ids as u64;
        *self.completed_by_priority.entry(priority).or_default() += 1;
        self.last_batch_at = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.batches_completed;
        self.avg_batch_duration = if count == 1 {
            duration
        } else {
            let prev = self.avg_batch_duration.as_nanos() as f64;
            let cur = duration.as_nanos() as f64;
            Duration::from_nanos((prev + (cur - prev) / count as f64) as u64)
        };
    }
}
