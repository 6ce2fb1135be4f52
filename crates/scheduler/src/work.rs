use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::types::SchedulerConfig;

/// Result of processing a single id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub id: String,
    pub data: String,
}

/// Per-id unit of work executed by the batch processor.
///
/// The processor runs `fetch` for every id of a batch concurrently and waits
/// for all of them before marking the batch completed. Implementations are
/// treated as infallible.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    async fn fetch(&self, id: &str) -> FetchOutcome;
}

/// Simulated fetch: sleeps for a fixed delay, then reports the id as processed.
#[derive(Debug, Clone)]
pub struct SimulatedFetch {
    delay: Duration,
}

impl SimulatedFetch {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.per_id_processing_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl UnitOfWork for SimulatedFetch {
    fn name(&self) -> &str {
        "simulated_fetch"
    }

    async fn fetch(&self, id: &str) -> FetchOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!(id = %id, "fetched");
        FetchOutcome {
            id: id.to_string(),
            data: "processed".to_string(),
        }
    }
}
