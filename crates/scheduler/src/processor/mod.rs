//! Batch processor -- the single background consumer of the job queue.
//!
//! Split into focused submodules:
//! - `core`: BatchProcessor struct, constructor, accessors, and shutdown
//! - `execution`: per-tick job handling and the fixed-interval run loop

mod core;
mod execution;

pub use self::core::BatchProcessor;
pub use self::execution::TickOutcome;
