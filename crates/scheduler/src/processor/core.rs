use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::metrics::ProcessorMetrics;
use crate::queue::PriorityJobQueue;
use crate::store::IngestionStore;
use crate::types::SchedulerConfig;
use crate::work::UnitOfWork;

/// Drains the job queue one batch per tick.
///
/// This is the only writer of batch and ingestion status after planning.
/// Run exactly one instance per queue: the one-batch-per-tick pacing relies
/// on a single consumer.
pub struct BatchProcessor {
    pub(super) store: IngestionStore,
    pub(super) queue: PriorityJobQueue,
    pub(super) work: Arc<dyn UnitOfWork>,
    /// Tick interval.
    pub(super) interval: Duration,
    pub(super) metrics: Arc<RwLock<ProcessorMetrics>>,
    /// Shutdown flag, checked between ticks.
    pub(super) shutdown: Arc<AtomicBool>,
    /// Wakes the run loop when shutdown is requested mid-wait.
    pub(super) wake: Arc<Notify>,
}

impl BatchProcessor {
    pub fn new(
        config: &SchedulerConfig,
        store: IngestionStore,
        queue: PriorityJobQueue,
        work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            store,
            queue,
            work,
            // A zero interval would turn the loop into a busy spin.
            interval: config.batch_delay().max(Duration::from_millis(1)),
            metrics: Arc::new(RwLock::new(ProcessorMetrics::default())),
            shutdown: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot of the current metrics.
    pub fn metrics(&self) -> ProcessorMetrics {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Spawn the run loop on the tokio runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Ask the run loop to stop after the current tick. A batch already in
    /// flight still runs to completion.
    pub fn shutdown(&self) {
        info!("batch processor shutdown requested");
        self.shutdown.store(true, Ordering::Relaxed);
        self.wake.notify_one();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
