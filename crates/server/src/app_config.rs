//! Application configuration builders.

use batchflow_scheduler::SchedulerConfig;

use crate::cli::Cli;

/// Load configuration from `.env` and environment variables, then apply CLI
/// overrides.
pub fn load_config(cli: &Cli) -> batchflow_core::Config {
    batchflow_core::config::load_dotenv();
    let mut config = batchflow_core::Config::from_env();
    cli.apply(&mut config);
    config
}

/// Scheduler settings derived from the batching section.
pub fn scheduler_config(config: &batchflow_core::Config) -> SchedulerConfig {
    SchedulerConfig::from(&config.batching)
}
