use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use batchflow_core::BatchingConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulerError;

/// Opaque identifier of an ingestion request.
pub type IngestionId = Uuid;

/// Opaque identifier of a single batch.
pub type BatchId = Uuid;

/// Submission priority. Lower rank = served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Numeric rank used by the job queue comparator.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = SchedulerError;

    /// Exact, case-sensitive match on `HIGH`, `MEDIUM`, `LOW`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(SchedulerError::InvalidInput(format!(
                "unrecognized priority '{}' (expected HIGH, MEDIUM or LOW)",
                other
            ))),
        }
    }
}

/// Progress state shared by batches and ingestions.
///
/// Variant order is the only legal direction of travel; `Ord` reflects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    YetToStart,
    Triggered,
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::YetToStart => "yet_to_start",
            Status::Triggered => "triggered",
            Status::Completed => "completed",
        }
    }

    /// Whether a batch in `self` may move to `next`. Only forward moves are legal.
    pub fn can_advance_to(self, next: Status) -> bool {
        next > self
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler configuration. Usually derived from [`BatchingConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Max ids per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Processor tick interval in milliseconds.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Simulated per-id fetch latency in milliseconds.
    #[serde(default = "default_per_id_delay_ms")]
    pub per_id_processing_delay_ms: u64,
}

fn default_batch_size() -> usize { batchflow_core::config::DEFAULT_BATCH_SIZE }
fn default_batch_delay_ms() -> u64 { batchflow_core::config::DEFAULT_BATCH_DELAY_MS }
fn default_per_id_delay_ms() -> u64 { batchflow_core::config::DEFAULT_PER_ID_PROCESSING_DELAY_MS }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            per_id_processing_delay_ms: default_per_id_delay_ms(),
        }
    }
}

impl From<&BatchingConfig> for SchedulerConfig {
    fn from(b: &BatchingConfig) -> Self {
        Self {
            batch_size: b.batch_size,
            batch_delay_ms: b.batch_delay_ms,
            per_id_processing_delay_ms: b.per_id_processing_delay_ms,
        }
    }
}

impl SchedulerConfig {
    /// Reject settings that would stall the planner or spin the processor.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.batch_size == 0 {
            return Err(SchedulerError::Config("batch_size must be at least 1".into()));
        }
        if self.batch_delay_ms == 0 {
            return Err(SchedulerError::Config("batch_delay_ms must be at least 1".into()));
        }
        Ok(())
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn per_id_processing_delay(&self) -> Duration {
        Duration::from_millis(self.per_id_processing_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks() {
        assert_eq!(Priority::High.rank(), 1);
        assert_eq!(Priority::Medium.rank(), 2);
        assert_eq!(Priority::Low.rank(), 3);
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn priority_parse_is_exact() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("LOW".parse::<Priority>().unwrap(), Priority::Low);
        assert!("high".parse::<Priority>().is_err());
        assert!("URGENT".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"MEDIUM\"");
        let p: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn status_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Status::YetToStart).unwrap(), "\"yet_to_start\"");
        assert_eq!(serde_json::to_string(&Status::Triggered).unwrap(), "\"triggered\"");
        assert_eq!(serde_json::to_string(&Status::Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn status_only_advances_forward() {
        assert!(Status::YetToStart.can_advance_to(Status::Triggered));
        assert!(Status::Triggered.can_advance_to(Status::Completed));
        assert!(!Status::Completed.can_advance_to(Status::Triggered));
        assert!(!Status::Triggered.can_advance_to(Status::YetToStart));
        assert!(!Status::Triggered.can_advance_to(Status::Triggered));
    }

    #[test]
    fn scheduler_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.batch_delay(), Duration::from_millis(5000));
        assert_eq!(config.per_id_processing_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scheduler_config_partial_json_uses_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"batch_size": 10}"#).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.batch_delay_ms, 5000);
    }

    #[test]
    fn scheduler_config_rejects_zero() {
        let mut config = SchedulerConfig::default();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(SchedulerError::Config(_))));

        let mut config = SchedulerConfig::default();
        config.batch_delay_ms = 0;
        assert!(config.validate().is_err());
    }
}
