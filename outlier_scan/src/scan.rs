//! Batch orchestration: discover data files in an exchange folder, sample them
//! at random and run each sample through load, detect and report.
//!
//! Per-sample failures that describe bad input (missing or short files,
//! malformed prices, degenerate windows) are logged and skipped; the batch
//! carries on. Report write failures are logged and the sample is still kept.
//! Anything else ends the run with an error.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    config::ScanConfig,
    detector::{self, DetectError},
    loader::{self, LoadError},
    models::{OutlierRecord, SampleResult},
    random::RandomSource,
    report::{CsvReportWriter, ReportSink, WriteOutcome},
};

/// Errors raised by a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Loading a sample failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Computing statistics for a sample failed.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// The exchange folder could not be listed.
    #[error("failed to list data files in {}", folder.display())]
    Discovery {
        /// Folder being listed.
        folder: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Samples were requested but the folder holds no data files.
    #[error("no .{extension} data files found in {}", folder.display())]
    NoDataFiles {
        /// Folder that was scanned.
        folder: PathBuf,
        /// Extension that was looked for.
        extension: String,
    },
}

impl ScanError {
    /// Whether the batch should log this error and continue with the next sample.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScanError::Load(e) => e.is_recoverable(),
            ScanError::Detect(_) => true,
            ScanError::Discovery { .. } | ScanError::NoDataFiles { .. } => false,
        }
    }
}

/// Exchange label for a folder: its final path component.
pub fn exchange_name(folder: &Path) -> String {
    if let Some(name) = folder.file_name() {
        return name.to_string_lossy().into_owned();
    }
    // "." and ".." have no file name of their own
    folder
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| folder.display().to_string())
}

/// Lists the data files directly inside `folder`, sorted by path.
///
/// A file qualifies when its extension equals `config.data_extension` and its
/// stem does not end with `config.report_suffix`.
pub fn discover_data_files(folder: &Path, config: &ScanConfig) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_data = path
            .extension()
            .is_some_and(|ext| ext == config.data_extension.as_str());
        let is_report = path
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(&config.report_suffix));
        if is_data && !is_report {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs samples against one exchange folder.
pub struct Scanner<S = CsvReportWriter> {
    config: ScanConfig,
    sink: S,
}

impl Scanner {
    /// Scanner that writes CSV reports with the configured suffix.
    pub fn new(config: ScanConfig) -> Self {
        let sink = CsvReportWriter::new(config.report_suffix.clone());
        Self { config, sink }
    }
}

impl<S: ReportSink> Scanner<S> {
    /// Scanner with a custom report destination.
    pub fn with_sink(config: ScanConfig, sink: S) -> Self {
        Self { config, sink }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Draws `num_files` samples (with replacement) from the data files in
    /// `folder` and returns one [`SampleResult`] per sample that succeeded.
    pub fn run<R>(
        &self,
        folder: &Path,
        num_files: usize,
        rng: &mut R,
    ) -> Result<Vec<SampleResult>, ScanError>
    where
        R: RandomSource + ?Sized,
    {
        let exchange = exchange_name(folder);
        let candidates =
            discover_data_files(folder, &self.config).map_err(|source| ScanError::Discovery {
                folder: folder.to_path_buf(),
                source,
            })?;

        if num_files == 0 {
            return Ok(Vec::new());
        }
        if candidates.is_empty() {
            return Err(ScanError::NoDataFiles {
                folder: folder.to_path_buf(),
                extension: self.config.data_extension.clone(),
            });
        }
        info!(%exchange, files = candidates.len(), samples = num_files, "starting scan");

        let mut results = Vec::with_capacity(num_files);
        for sample in 1..=num_files {
            let path = &candidates[rng.below(candidates.len())];
            debug!(%exchange, sample, path = %path.display(), "sampling file");

            let outliers = match self.sample(path, rng) {
                Ok(outliers) => outliers,
                Err(e) if e.is_recoverable() => {
                    warn!(%exchange, sample, error = %e, "error processing sample");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.sink.write(&outliers, path) {
                Ok(WriteOutcome::Written { path, rows }) => {
                    debug!(%exchange, sample, rows, report = %path.display(), "report written");
                }
                Ok(WriteOutcome::NoOutliers) => {}
                Err(e) => error!(%exchange, sample, error = %e, "error writing outlier report"),
            }

            results.push(SampleResult {
                exchange: exchange.clone(),
                outliers,
            });
        }
        Ok(results)
    }

    fn sample<R>(&self, path: &Path, rng: &mut R) -> Result<Vec<OutlierRecord>, ScanError>
    where
        R: RandomSource + ?Sized,
    {
        let window = loader::load_window(path, self.config.window_size, rng)?;
        Ok(detector::detect(&window)?)
    }
}

/// Runs a scan of `folder` with CSV reports. See [`Scanner::run`].
pub fn run<R>(
    folder: impl AsRef<Path>,
    num_files: usize,
    config: &ScanConfig,
    rng: &mut R,
) -> Result<Vec<SampleResult>, ScanError>
where
    R: RandomSource + ?Sized,
{
    Scanner::new(config.clone()).run(folder.as_ref(), num_files, rng)
}
