//! Cheap pre-decode checks run on the worker before scoring.
//!
//! Format detection is left to the decoder, which sniffs content and falls
//! back to the extension. Only checks that avoid reading the whole file
//! live here.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::ScoreError;

const MIB: u64 = 1024 * 1024;

/// Rejects files that are missing or too large, before paying for a read.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check that `path` is an existing file within the size limit.
    pub fn validate(&self, path: &Path) -> Result<(), ScoreError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ScoreError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => {
                return Err(ScoreError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Cannot read metadata: {e}"),
                })
            }
        };

        if !metadata.is_file() {
            return Err(ScoreError::Decode {
                path: path.to_path_buf(),
                message: "Not a regular file".to_string(),
            });
        }

        let len = metadata.len();
        if len > self.limits.max_file_size_mb.saturating_mul(MIB) {
            return Err(ScoreError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: len / MIB,
                max_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(())
    }
}
