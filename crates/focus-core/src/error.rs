//! Error types for the focus scoring pipeline.
//!
//! Errors are split by blast radius: configuration errors stop a run before
//! any work is dispatched, score errors are contained to a single job, and
//! report errors abort the run after the pool has drained.

use std::path::PathBuf;
use thiserror::Error;

use crate::batch::Phase;

/// Top-level error type for focus operations.
#[derive(Error, Debug)]
pub enum FocusError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The report could not be persisted
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// The worker pool could not be started
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// `run` was called on an orchestrator that already started a batch
    #[error("Batch cannot start from phase {0}")]
    PhaseOrder(Phase),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required option was not supplied
    #[error("Missing required option: --{0}")]
    MissingOption(&'static str),

    /// The input directory does not exist or is not a directory
    #[error("Not a directory: {0}")]
    InvalidDirectory(PathBuf),

    /// The input directory could not be listed
    #[error("Cannot read directory {path}: {source}")]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Per-job scoring errors. None of these abort a batch.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Decoded image has no pixels
    #[error("Image has no pixels: {0}")]
    EmptyImage(PathBuf),
}

impl ScoreError {
    /// Path of the job that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Decode { path, .. }
            | Self::FileTooLarge { path, .. }
            | Self::ImageTooLarge { path, .. }
            | Self::UnsupportedFormat { path, .. } => path,
            Self::FileNotFound(path) | Self::EmptyImage(path) => path,
        }
    }
}

/// Report persistence errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The CSV file could not be created or written
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for focus results.
pub type Result<T> = std::result::Result<T, FocusError>;

/// Convenience type alias for per-job scoring results.
pub type ScoreResult<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_error_path() {
        let err = ScoreError::FileTooLarge {
            path: PathBuf::from("/photos/huge.png"),
            size_mb: 300,
            max_mb: 100,
        };
        assert_eq!(err.path(), std::path::Path::new("/photos/huge.png"));

        let err = ScoreError::EmptyImage(PathBuf::from("empty.png"));
        assert_eq!(err.path(), std::path::Path::new("empty.png"));
    }

    #[test]
    fn test_missing_option_message_names_flag() {
        let err = ConfigError::MissingOption("save-to");
        assert_eq!(err.to_string(), "Missing required option: --save-to");
    }

    #[test]
    fn test_report_error_wraps_into_focus_error() {
        let err: FocusError = ReportError::Write {
            path: PathBuf::from("/readonly/laplacian.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(err.to_string().contains("/readonly/laplacian.csv"));
    }

    #[test]
    fn test_phase_order_names_phase() {
        assert_eq!(
            FocusError::PhaseOrder(Phase::Done).to_string(),
            "Batch cannot start from phase done"
        );
    }
}
