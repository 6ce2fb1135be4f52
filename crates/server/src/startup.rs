//! Server startup: shared state initialization and background task spawning.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use batchflow_scheduler::{
    BatchProcessor, IngestionPlanner, IngestionStore, PriorityJobQueue, SchedulerError,
    SimulatedFetch, UnitOfWork,
};

use crate::app_config;
use crate::state::AppState;

/// Build `AppState` with the given unit of work. The processor is created but
/// not started.
pub fn build_app_state(
    config: batchflow_core::Config,
    work: Arc<dyn UnitOfWork>,
) -> Result<Arc<AppState>, SchedulerError> {
    let scheduler_config = app_config::scheduler_config(&config);
    scheduler_config.validate()?;

    let store = IngestionStore::new();
    let queue = PriorityJobQueue::new();
    let planner = IngestionPlanner::new(store.clone(), queue.clone(), &scheduler_config);
    let processor = Arc::new(BatchProcessor::new(
        &scheduler_config,
        store.clone(),
        queue.clone(),
        work,
    ));

    info!(
        batch_size = planner.batch_size(),
        interval_ms = processor.interval().as_millis() as u64,
        "scheduler initialized"
    );

    Ok(Arc::new(AppState {
        config,
        store,
        queue,
        planner,
        processor,
    }))
}

/// Build `AppState` backed by the simulated per-id fetch.
pub fn build_default_app_state(config: batchflow_core::Config) -> Result<Arc<AppState>, SchedulerError> {
    let work = Arc::new(SimulatedFetch::from_config(&app_config::scheduler_config(&config)));
    build_app_state(config, work)
}

/// Start the batch processor loop.
pub fn spawn_background_tasks(state: &AppState) -> JoinHandle<()> {
    state.processor.clone().spawn()
}
