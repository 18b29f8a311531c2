//! The single fan-in point shared by every worker.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::ThreadId;

use crate::types::ScoreRecord;

/// Many-writer, single-reader collection of score records.
///
/// One mutex guards both the records and the set of worker threads that
/// wrote them. Callers compute the score first and only take the lock to
/// append.
#[derive(Debug, Default)]
pub struct ResultSink {
    state: Mutex<SinkState>,
}

#[derive(Debug, Default)]
struct SinkState {
    records: Vec<ScoreRecord>,
    workers: HashSet<ThreadId>,
}

/// Everything the sink collected, handed over once the pool has drained.
#[derive(Debug, Default)]
pub struct SinkSnapshot {
    /// Records in completion order (not meaningful)
    pub records: Vec<ScoreRecord>,
    /// Number of distinct worker threads that recorded a score
    pub workers_used: usize,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for an expected number of records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(SinkState {
                records: Vec::with_capacity(capacity),
                workers: HashSet::new(),
            }),
        }
    }

    /// Append one record, attributing it to the calling thread.
    pub fn record(&self, path: impl Into<PathBuf>, score: f64) {
        let record = ScoreRecord::new(path, score);
        let worker = std::thread::current().id();

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.workers.insert(worker);
        state.records.push(record);
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the sink and take its contents.
    ///
    /// Call after the pool has drained. If some other handle is still alive
    /// the contents are moved out under the lock and the sink is left empty.
    pub fn into_snapshot(self: Arc<Self>) -> SinkSnapshot {
        let state = match Arc::try_unwrap(self) {
            Ok(sink) => sink.state.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => {
                tracing::warn!("Result sink still shared after drain; taking contents");
                let mut guard = shared.state.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *guard)
            }
        };

        SinkSnapshot {
            workers_used: state.workers.len(),
            records: state.records,
        }
    }
}
