//! Core data types shared by the pool, the sink and the report.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// One unit of work: score a single image file.
///
/// The path is resolved when the directory is enumerated and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    path: PathBuf,
}

impl Job {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// A successfully scored image.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    /// Path of the source file, as enumerated
    pub path: PathBuf,

    /// Variance of the Laplacian; higher means sharper
    pub score: f64,
}

impl ScoreRecord {
    pub fn new(path: impl Into<PathBuf>, score: f64) -> Self {
        Self {
            path: path.into(),
            score,
        }
    }
}

/// How a single job ended, as reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Scored,
    Failed,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Jobs submitted to the pool
    pub submitted: usize,

    /// Images scored successfully
    pub succeeded: usize,

    /// Images that could not be scored (including panicked jobs)
    pub failed: usize,

    /// Distinct worker threads that recorded at least one score
    pub workers_used: usize,

    /// Wall time from first submit to drain
    pub elapsed: Duration,
}

impl ProcessingStats {
    /// Images per second over the whole batch.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.succeeded + self.failed) as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_keeps_path() {
        let job = Job::new("photos/a.jpg");
        assert_eq!(job.path(), Path::new("photos/a.jpg"));
        assert_eq!(job.into_path(), PathBuf::from("photos/a.jpg"));
    }

    #[test]
    fn test_rate_with_zero_elapsed() {
        let stats = ProcessingStats {
            succeeded: 10,
            ..Default::default()
        };
        assert_eq!(stats.rate(), 0.0);
    }

    #[test]
    fn test_rate_counts_failures() {
        let stats = ProcessingStats {
            submitted: 4,
            succeeded: 3,
            failed: 1,
            workers_used: 2,
            elapsed: Duration::from_secs(2),
        };
        assert!((stats.rate() - 2.0).abs() < f64::EPSILON);
    }
}
