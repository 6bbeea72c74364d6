//! Outlier report emission.
//!
//! Reports are written as CSV next to the scanned file, named
//! `<source stem><suffix>.csv` (suffix `_outliers` by default). A window with
//! no outliers produces no file at all.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::OutlierRecord;

/// Header row of every report, in column order.
pub const REPORT_HEADER: [&str; 6] = [
    "Stock-ID",
    "Timestamp",
    "Actual Price",
    "Mean",
    "Difference",
    "% Deviation",
];

/// Default suffix appended to the source stem.
pub const DEFAULT_REPORT_SUFFIX: &str = "_outliers";

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be created or written.
    #[error("failed to write outlier report {}", path.display())]
    Write {
        /// Target report path.
        path: PathBuf,
        /// Underlying CSV or I/O error.
        #[source]
        source: csv::Error,
    },
}

/// What a successful write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing was flagged, so no file was created.
    NoOutliers,
    /// A report with `rows` data rows was written to `path`.
    Written {
        /// Path of the report file.
        path: PathBuf,
        /// Number of outlier rows written (header excluded).
        rows: usize,
    },
}

/// Destination for the outliers found in one sample.
pub trait ReportSink {
    /// Persists `outliers` found in `source`.
    fn write(
        &self,
        outliers: &[OutlierRecord],
        source: &Path,
    ) -> Result<WriteOutcome, ReportError>;
}

/// Writes CSV reports beside the source file.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    suffix: String,
}

impl CsvReportWriter {
    /// Creates a writer that names reports `<stem><suffix>.csv`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Report path for `source`.
    pub fn report_path(&self, source: &Path) -> PathBuf {
        report_path(source, &self.suffix)
    }
}

impl Default for CsvReportWriter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_SUFFIX)
    }
}

impl ReportSink for CsvReportWriter {
    fn write(
        &self,
        outliers: &[OutlierRecord],
        source: &Path,
    ) -> Result<WriteOutcome, ReportError> {
        if outliers.is_empty() {
            info!(source = %source.display(), "no outliers found, skipping report");
            return Ok(WriteOutcome::NoOutliers);
        }

        info!(count = outliers.len(), source = %source.display(), "found outliers, writing report");
        let path = self.report_path(source);
        write_csv(&path, outliers).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(WriteOutcome::Written {
            path,
            rows: outliers.len(),
        })
    }
}

/// `<dir>/<stem><suffix>.csv` for a given source file.
pub fn report_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{suffix}.csv"))
}

/// Turns a record into its six report fields, in header order.
pub fn report_row(rec: &OutlierRecord) -> [String; 6] {
    [
        rec.stock_id.clone(),
        rec.timestamp.clone(),
        rec.actual_price.to_string(),
        rec.mean.to_string(),
        rec.difference.to_string(),
        rec.percent_deviation.to_string(),
    ]
}

fn write_csv(path: &Path, outliers: &[OutlierRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REPORT_HEADER)?;
    for rec in outliers {
        writer.write_record(report_row(rec))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn record(ts: &str, price: f64, mean: f64) -> OutlierRecord {
        OutlierRecord {
            stock_id: "ASH".into(),
            timestamp: ts.into(),
            actual_price: price,
            mean,
            difference: (price - mean).abs(),
            percent_deviation: (price - mean).abs() / mean * 100.0,
        }
    }

    #[test]
    fn report_path_replaces_stem() {
        assert_eq!(
            report_path(Path::new("/data/LSE/ASH.csv"), "_outliers"),
            PathBuf::from("/data/LSE/ASH_outliers.csv")
        );
        assert_eq!(
            report_path(Path::new("rel/file.name.csv"), "_x"),
            PathBuf::from("rel/file.name_x.csv")
        );
    }

    #[test]
    fn empty_outliers_create_no_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("ASH.csv");
        let outcome = CsvReportWriter::default().write(&[], &source).unwrap();

        assert_eq!(outcome, WriteOutcome::NoOutliers);
        assert!(!dir.path().join("ASH_outliers.csv").exists());
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("ASH.csv");
        let outliers = vec![record("01-09-2023", 150.0, 100.0), record("05-09-2023", 25.0, 100.0)];

        let outcome = CsvReportWriter::default().write(&outliers, &source).unwrap();
        let path = dir.path().join("ASH_outliers.csv");
        assert_eq!(
            outcome,
            WriteOutcome::Written {
                path: path.clone(),
                rows: 2
            }
        );

        let text = std::fs::read_to_string(&path).unwrap();
        insta::assert_snapshot!(text, @r"
        Stock-ID,Timestamp,Actual Price,Mean,Difference,% Deviation
        ASH,01-09-2023,150,100,50,50
        ASH,05-09-2023,25,100,75,75
        ");
    }

    #[test]
    fn unwritable_target_is_report_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing_dir").join("ASH.csv");
        let err = CsvReportWriter::default()
            .write(&[record("01-09-2023", 150.0, 100.0)], &source)
            .unwrap_err();
        let ReportError::Write { path, .. } = err;
        assert!(path.ends_with("missing_dir/ASH_outliers.csv"));
    }
}
