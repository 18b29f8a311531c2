//! Fixed-size worker pool for CPU-bound scoring jobs.
//!
//! The pool owns a dedicated multi-threaded tokio runtime with exactly
//! `worker_count` worker threads. Each submitted job becomes one task; tasks
//! never yield, so a job runs start to finish on the worker that picked it up.
//! The runtime's task queue is the job queue.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::error::{FocusError, Result};

/// Outcome of [`WorkerPool::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs that ran to completion
    pub completed: usize,
    /// Jobs that panicked; their work is lost but the pool kept going
    pub panicked: usize,
}

/// Bounded pool of OS threads fed from a shared job queue.
pub struct WorkerPool {
    runtime: Runtime,
    worker_count: usize,
    pending: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `worker_count` worker threads.
    pub fn new(worker_count: NonZeroUsize) -> Result<Self> {
        let worker_count = worker_count.get();
        let next_id = Arc::new(AtomicUsize::new(0));

        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_count)
            .thread_name_fn(move || {
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                format!("focus-worker-{id}")
            })
            .build()
            .map_err(|e| FocusError::Pool(format!("failed to start {worker_count} workers: {e}")))?;

        tracing::debug!("Worker pool started with {} threads", worker_count);

        Ok(Self {
            runtime,
            worker_count,
            pending: Vec::new(),
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Jobs submitted and not yet drained.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a job. Returns immediately; the job runs on some worker.
    pub fn submit<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = self.runtime.spawn(async move { job() });
        self.pending.push(handle);
    }

    /// Block until every submitted job has finished, then stop the workers.
    ///
    /// A panicking job is counted and logged; it never takes other jobs or
    /// the pool down with it.
    pub fn drain(self) -> DrainReport {
        let WorkerPool {
            runtime, pending, ..
        } = self;

        let report = runtime.block_on(async move {
            let mut report = DrainReport::default();
            for handle in pending {
                match handle.await {
                    Ok(()) => report.completed += 1,
                    Err(e) => {
                        tracing::error!("Worker job panicked: {e}");
                        report.panicked += 1;
                    }
                }
            }
            report
        });

        // All tasks are finished; dropping the runtime joins the worker threads.
        drop(runtime);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn pool(n: usize) -> WorkerPool {
        WorkerPool::new(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_drain_waits_for_every_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool = pool(3);
        for _ in 0..200 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(pool.pending(), 200);

        let report = pool.drain();
        assert_eq!(report.completed, 200);
        assert_eq!(report.panicked, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_jobs_never_exceed_worker_count() {
        let threads = Arc::new(Mutex::new(HashSet::new()));
        let mut pool = pool(2);
        for _ in 0..64 {
            let threads = Arc::clone(&threads);
            pool.submit(move || {
                std::thread::sleep(std::time::Duration::from_millis(1));
                threads.lock().unwrap().insert(std::thread::current().id());
            });
        }
        pool.drain();

        let used = threads.lock().unwrap().len();
        assert!((1..=2).contains(&used), "used {used} threads");
    }

    #[test]
    fn test_worker_threads_are_named() {
        let names = Arc::new(Mutex::new(Vec::new()));
        let mut pool = pool(1);
        let sink = Arc::clone(&names);
        pool.submit(move || {
            let name = std::thread::current().name().map(str::to_string);
            sink.lock().unwrap().push(name);
        });
        pool.drain();

        let names = names.lock().unwrap();
        assert_eq!(names.len(), 1);
        assert!(names[0].as_deref().unwrap_or("").starts_with("focus-worker-"));
    }

    #[test]
    fn test_panicking_job_does_not_stop_others() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool = pool(2);
        for i in 0..10 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                if i == 3 {
                    panic!("job {i} blew up");
                }
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        let report = pool.drain();
        assert_eq!(report.completed, 9);
        assert_eq!(report.panicked, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_drain_with_no_jobs() {
        let report = pool(4).drain();
        assert_eq!(report, DrainReport::default());
    }
}
