//! Ranking and persistence of a finished batch.
//!
//! A [`Report`] is built from the frozen sink contents. It sorts once, then
//! serves the console listings and the CSV artifact from the same order, so
//! writing the same records twice produces identical bytes.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::ReportError;
use crate::types::ScoreRecord;

/// CSV header row.
pub const CSV_HEADER: &str = "FilePath,LaplacianVariance";

/// Score records sorted ascending by score.
#[derive(Debug, Clone, Default)]
pub struct Report {
    records: Vec<ScoreRecord>,
}

impl Report {
    /// Sort `records` ascending by score.
    ///
    /// The sort is stable: equal scores keep their input order.
    pub fn new(mut records: Vec<ScoreRecord>) -> Self {
        records.sort_by(|a, b| a.score.total_cmp(&b.score));
        Self { records }
    }

    /// All records, lowest score first.
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `n` sharpest records, highest score first.
    pub fn highest(&self, n: usize) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter().rev().take(n)
    }

    /// Up to `n` blurriest records, lowest score first.
    pub fn lowest(&self, n: usize) -> &[ScoreRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Render the highest/lowest listings shown on the console.
    pub fn summary(&self, n: usize) -> String {
        let mut out = String::new();
        let shown = n.min(self.records.len());

        let _ = writeln!(out, "== [Top {shown} variances] ==");
        for record in self.highest(n) {
            let _ = writeln!(out, "{}", summary_line(record));
        }
        let _ = writeln!(out, "== [Lowest {shown} variances] ==");
        for record in self.lowest(n) {
            let _ = writeln!(out, "{}", summary_line(record));
        }
        out
    }

    /// Write the CSV report to any writer.
    pub fn write_csv<W: Write>(&self, writer: W) -> io::Result<usize> {
        let mut csv = CsvWriter::new(writer)?;
        for record in &self.records {
            csv.write(record)?;
        }
        csv.flush()?;
        Ok(csv.rows_written())
    }

    /// Create (or truncate) `path` and write the CSV report into it.
    pub fn save(&self, path: &Path) -> Result<usize, ReportError> {
        let to_err = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(to_err)?;
        let rows = self.write_csv(BufWriter::new(file)).map_err(to_err)?;
        tracing::info!("Report written to {:?} ({} rows)", path, rows);
        Ok(rows)
    }
}

fn summary_line(record: &ScoreRecord) -> String {
    format!(
        "File: {}\t Mean Variance found: {}",
        record.path.display(),
        format_score(record.score)
    )
}

/// Shortest decimal that parses back to the same `f64`.
///
/// Ordinary magnitudes keep a fractional part (`80.0`, not `80`); very
/// large or very small ones use exponent form (`1e21`, `2.5e-7`), which
/// CSV readers parse as numbers too.
pub fn format_score(score: f64) -> String {
    format!("{score:?}")
}

/// Quote a field, doubling any embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Row-at-a-time writer for the `FilePath,LaplacianVariance` format.
pub struct CsvWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Wrap `writer` and emit the header row.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write one `"<path>",<score>` row.
    pub fn write(&mut self, record: &ScoreRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{}",
            quote(&record.path.to_string_lossy()),
            format_score(record.score)
        )?;
        self.rows_written += 1;
        Ok(())
    }

    /// Get the number of data rows written (header excluded).
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
