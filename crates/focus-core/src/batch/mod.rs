//! Parallel batch processing.
//!
//! ```text
//! jobs → WorkerPool (N threads) → ResultSink (one lock) → drain → Report
//! ```
//!
//! - **pool**: fixed-size worker pool with a single drain barrier
//! - **sink**: the synchronized fan-in collection
//! - **threads**: worker-count policy
//! - **orchestrator**: lifecycle from dispatch to persisted report

pub mod orchestrator;
pub mod pool;
pub mod sink;
pub mod threads;

pub use orchestrator::{BatchOutcome, BatchPlan, Orchestrator, Phase};
pub use pool::{DrainReport, WorkerPool};
pub use sink::{ResultSink, SinkSnapshot};
pub use threads::{
    default_worker_count, hardware_parallelism, resolve_worker_count, WorkerCount,
    WorkerCountSource,
};
