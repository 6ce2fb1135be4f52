pub mod config;

pub use config::{BatchingConfig, Config, ServerConfig};
