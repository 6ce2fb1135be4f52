//! CLI argument parsing.

use clap::Parser;

/// Batch ingestion server: accepts id lists and processes them in prioritized batches.
#[derive(Parser, Debug, Default)]
#[command(name = "batchflow-server", version, about)]
pub struct Cli {
    /// Listen port (overrides PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Max ids per batch (overrides BATCH_SIZE).
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Processor tick interval in milliseconds (overrides BATCH_DELAY_MS).
    #[arg(long)]
    pub batch_delay_ms: Option<u64>,

    /// Simulated per-id work in milliseconds (overrides PER_ID_PROCESSING_DELAY).
    #[arg(long)]
    pub per_id_delay_ms: Option<u64>,
}

impl Cli {
    /// Apply explicit flags on top of the environment config.
    pub fn apply(&self, config: &mut batchflow_core::Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(size) = self.batch_size {
            config.batching.batch_size = size;
        }
        if let Some(delay) = self.batch_delay_ms {
            config.batching.batch_delay_ms = delay;
        }
        if let Some(delay) = self.per_id_delay_ms {
            config.batching.per_id_processing_delay_ms = delay;
        }
    }
}
