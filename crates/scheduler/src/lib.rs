//! Priority batch scheduling for id ingestion.
//!
//! An [`IngestionPlanner`] splits a submitted id list into fixed-size batches,
//! records them in the [`IngestionStore`], and queues one job per batch on the
//! [`PriorityJobQueue`]. A single [`BatchProcessor`] drains that queue one
//! batch per tick, running the batch's ids through a [`UnitOfWork`] and
//! re-deriving the ingestion's status after every transition.

pub mod error;
pub mod metrics;
pub mod planner;
pub mod processor;
pub mod queue;
pub mod status;
pub mod store;
pub mod submission;
pub mod types;
pub mod work;

pub use error::SchedulerError;
pub use metrics::ProcessorMetrics;
pub use planner::{partition, IngestionPlanner};
pub use processor::{BatchProcessor, TickOutcome};
pub use queue::{CreationStamp, Job, PriorityJobQueue};
pub use status::overall_status;
pub use store::{BatchStatus, IngestionStatus, IngestionStore, IngestionSummary};
pub use submission::Submission;
pub use types::{BatchId, IngestionId, Priority, SchedulerConfig, Status};
pub use work::{FetchOutcome, SimulatedFetch, UnitOfWork};
