//! File discovery: turn the input directory into the job list.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ConfigError;
use crate::types::Job;

/// Lists the files directly inside a directory.
///
/// Every regular file is a candidate; whether it is an image is decided by
/// the decoder, not by its name.
#[derive(Debug, Default)]
pub struct FileDiscovery {
    exclude: Option<PathBuf>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave `path` out of the listing. Used for the report itself when it
    /// is written into the scanned directory.
    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.exclude = Some(std::fs::canonicalize(&path).unwrap_or(path));
        self
    }

    /// List the regular files in `dir`.
    ///
    /// Non-recursive: subdirectories are skipped, not descended into.
    /// The listing is a snapshot taken now, sorted by path so the job
    /// order is deterministic. Failing to read `dir` itself is an error;
    /// an unreadable entry inside it is logged and skipped.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ConfigError::UnreadableDirectory {
                        path: dir.to_path_buf(),
                        source: e,
                    })
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            if entry.file_type().is_file() && !self.is_excluded(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Discover files and wrap each one as a [`Job`].
    pub fn jobs(&self, dir: &Path) -> Result<Vec<Job>, ConfigError> {
        Ok(self.discover(dir)?.into_iter().map(Job::new).collect())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        if path.file_name() != exclude.file_name() {
            return false;
        }
        path == exclude || std::fs::canonicalize(path).is_ok_and(|p| &p == exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_is_sorted_and_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("c.jpg"), b"c").unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"n").unwrap();
        std::fs::write(dir.path().join("scan"), b"s").unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        std::fs::write(dir.path().join("nested.jpg").join("b.jpg"), b"b").unwrap();

        let files = FileDiscovery::new().discover(dir.path()).unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("a.png"),
                dir.path().join("c.jpg"),
                dir.path().join("notes.txt"),
                dir.path().join("scan"),
            ]
        );
    }

    #[test]
    fn test_discover_skips_report_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        std::fs::write(dir.path().join("laplacian.csv"), b"FilePath").unwrap();

        let discovery = FileDiscovery::new().excluding(dir.path().join("laplacian.csv"));
        let files = discovery.discover(dir.path()).unwrap();

        assert_eq!(files, vec![dir.path().join("a.png")]);
    }

    #[test]
    fn test_discover_excludes_report_through_other_spelling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("laplacian.csv"), b"FilePath").unwrap();

        let report = dir.path().join("sub").join("..").join("laplacian.csv");
        let files = FileDiscovery::new()
            .excluding(report)
            .discover(dir.path())
            .unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileDiscovery::new().jobs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("removed");
        std::fs::create_dir(&gone).unwrap();
        std::fs::remove_dir(&gone).unwrap();

        let err = FileDiscovery::new().jobs(&gone).unwrap_err();
        assert!(matches!(err, ConfigError::UnreadableDirectory { ref path, .. } if *path == gone));
    }
}
