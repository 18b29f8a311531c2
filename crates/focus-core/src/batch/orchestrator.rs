//! Batch lifecycle: dispatch every job, wait for the pool, rank and persist.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{FocusError, Result};
use crate::pipeline::ScoreFunction;
use crate::report::Report;
use crate::types::{Job, JobOutcome, ProcessingStats};

use super::pool::WorkerPool;
use super::sink::ResultSink;
use super::threads::WorkerCount;

/// Lifecycle phases. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Configuring,
    Dispatching,
    Draining,
    Reporting,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configuring => "configuring",
            Phase::Dispatching => "dispatching",
            Phase::Draining => "draining",
            Phase::Reporting => "reporting",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// A validated run: where to read, where to write, how many workers.
///
/// Building one is the end of the `Configuring` phase.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub jobs: Vec<Job>,
    pub report_path: PathBuf,
    pub workers: WorkerCount,
}

/// What a finished batch produced.
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: Report,
    pub stats: ProcessingStats,
    pub report_path: PathBuf,
}

/// Wires the scorer, the pool, the sink and the report together.
pub struct Orchestrator<S> {
    scorer: Arc<S>,
    phase: Phase,
}

impl<S> Orchestrator<S>
where
    S: ScoreFunction + 'static,
{
    pub fn new(scorer: S) -> Self {
        Self::with_shared(Arc::new(scorer))
    }

    pub fn with_shared(scorer: Arc<S>) -> Self {
        Self {
            scorer,
            phase: Phase::Configuring,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase {} -> {}", self.phase, next);
        tracing::debug!("Batch phase: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Run a plan to completion.
    ///
    /// `on_job_done` is called from worker threads as each job finishes,
    /// outside the sink lock, including jobs that panic. An orchestrator
    /// runs one batch; calling `run` again fails with
    /// [`FocusError::PhaseOrder`].
    pub fn run<F>(&mut self, plan: BatchPlan, on_job_done: F) -> Result<BatchOutcome>
    where
        F: Fn(JobOutcome) + Send + Sync + 'static,
    {
        if self.phase != Phase::Configuring {
            return Err(FocusError::PhaseOrder(self.phase));
        }

        let BatchPlan {
            jobs,
            report_path,
            workers,
        } = plan;

        self.enter(Phase::Dispatching);
        let start = Instant::now();
        let submitted = jobs.len();
        let sink = Arc::new(ResultSink::with_capacity(submitted));
        let failed = Arc::new(AtomicUsize::new(0));
        let on_job_done = Arc::new(on_job_done);

        let mut pool = WorkerPool::new(workers.count)?;
        for job in jobs {
            let scorer = Arc::clone(&self.scorer);
            let sink = Arc::clone(&sink);
            let failed = Arc::clone(&failed);
            let on_job_done = Arc::clone(&on_job_done);

            pool.submit(move || {
                let scored =
                    panic::catch_unwind(AssertUnwindSafe(|| score_job(scorer.as_ref(), &sink, job)));
                match scored {
                    Ok(outcome) => {
                        if outcome == JobOutcome::Failed {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                        on_job_done(outcome);
                    }
                    Err(payload) => {
                        // The pool counts the panic; only the callback runs here.
                        on_job_done(JobOutcome::Failed);
                        panic::resume_unwind(payload);
                    }
                }
            });
        }
        tracing::debug!("Submitted {} jobs to {} workers", submitted, pool.worker_count());

        self.enter(Phase::Draining);
        let drained = pool.drain();
        let elapsed = start.elapsed();

        self.enter(Phase::Reporting);
        let snapshot = sink.into_snapshot();
        let stats = ProcessingStats {
            submitted,
            succeeded: snapshot.records.len(),
            failed: failed.load(Ordering::Relaxed) + drained.panicked,
            workers_used: snapshot.workers_used,
            elapsed,
        };
        debug_assert_eq!(stats.succeeded + stats.failed, stats.submitted);

        let report = Report::new(snapshot.records);
        report.save(&report_path)?;

        self.enter(Phase::Done);
        Ok(BatchOutcome {
            report,
            stats,
            report_path,
        })
    }
}

/// Score one job and record it. Failures are logged and dropped.
fn score_job<S: ScoreFunction + ?Sized>(scorer: &S, sink: &ResultSink, job: Job) -> JobOutcome {
    match scorer.score(job.path()) {
        Ok(score) => {
            sink.record(job.into_path(), score);
            JobOutcome::Scored
        }
        Err(e) => {
            tracing::warn!(path = ?e.path(), "Skipping image: {}", e);
            JobOutcome::Failed
        }
    }
}
