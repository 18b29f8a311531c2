//! Worker-count policy.

use std::num::NonZeroUsize;

/// Floor for the derived worker count.
const MIN_DEFAULT_WORKERS: usize = 2;

/// Threads left free for the rest of the system when deriving a default.
const RESERVED_THREADS: usize = 2;

/// Why a worker count was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCountSource {
    /// The caller's request was in range and used as-is
    Requested,
    /// Nothing was requested
    Default,
    /// A request was made but was zero or not below the hardware parallelism
    Rejected(usize),
}

/// The resolved number of workers and how it was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCount {
    pub count: NonZeroUsize,
    pub source: WorkerCountSource,
}

impl WorkerCount {
    pub fn get(&self) -> usize {
        self.count.get()
    }
}

/// Hardware threads available to this process. Never zero.
pub fn hardware_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// `max(hardware - 2, 2)`, safe for readings of 0 or 1.
pub fn default_worker_count(hardware: usize) -> NonZeroUsize {
    let n = hardware
        .saturating_sub(RESERVED_THREADS)
        .max(MIN_DEFAULT_WORKERS);
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

/// Accept `requested` when `0 < requested < hardware`, otherwise fall back
/// to [`default_worker_count`].
pub fn resolve_worker_count(requested: Option<usize>, hardware: usize) -> WorkerCount {
    match requested {
        Some(n) if n < hardware => match NonZeroUsize::new(n) {
            Some(count) => WorkerCount {
                count,
                source: WorkerCountSource::Requested,
            },
            None => WorkerCount {
                count: default_worker_count(hardware),
                source: WorkerCountSource::Rejected(n),
            },
        },
        Some(n) => WorkerCount {
            count: default_worker_count(hardware),
            source: WorkerCountSource::Rejected(n),
        },
        None => WorkerCount {
            count: default_worker_count(hardware),
            source: WorkerCountSource::Default,
        },
    }
}
