use std::sync::Arc;

use batchflow_scheduler::{BatchProcessor, IngestionPlanner, IngestionStore, PriorityJobQueue};

/// Shared handles for request handlers. Built once at startup.
pub struct AppState {
    pub config: batchflow_core::Config,
    pub store: IngestionStore,
    pub queue: PriorityJobQueue,
    pub planner: IngestionPlanner,
    pub processor: Arc<BatchProcessor>,
}
