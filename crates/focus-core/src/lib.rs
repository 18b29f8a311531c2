//! Focus Core - rank a directory of images by sharpness.
//!
//! Each image is scored by the variance of its Laplacian: the more
//! high-frequency detail, the higher the score. Scoring is embarrassingly
//! parallel, so the library fans jobs out over a fixed-size worker pool,
//! collects results in a single locked sink, and ranks them once the pool
//! has drained.
//!
//! # Architecture
//!
//! ```text
//! directory → jobs → WorkerPool (N-way) → ResultSink → drain → Report → CSV
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use focus_core::{BatchPlan, Config, FileDiscovery, LaplacianScorer, Orchestrator};
//!
//! let config = Config::load()?;
//! let jobs = FileDiscovery::new().jobs("./photos".as_ref())?;
//! let plan = BatchPlan {
//!     jobs,
//!     report_path: config.report_path("./out".as_ref()),
//!     workers: focus_core::resolve_worker_count(Some(4), focus_core::hardware_parallelism()),
//! };
//! let outcome = Orchestrator::new(LaplacianScorer::new(&config)).run(plan, |_| {})?;
//! print!("{}", outcome.report.summary(5));
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use batch::{
    hardware_parallelism, resolve_worker_count, BatchOutcome, BatchPlan, Orchestrator, Phase,
    ResultSink, WorkerCount, WorkerCountSource, WorkerPool,
};
pub use config::Config;
pub use error::{ConfigError, FocusError, ReportError, Result, ScoreError, ScoreResult};
pub use pipeline::{FileDiscovery, LaplacianScorer, ScoreFunction};
pub use report::Report;
pub use types::{Job, JobOutcome, ProcessingStats, ScoreRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
