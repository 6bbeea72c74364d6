//! Reads an exchange CSV file and cuts one random contiguous window out of it.
//!
//! Input rows carry no header and look like `stock_id,timestamp,price`; extra
//! trailing columns are ignored. Every row is parsed before a window is chosen,
//! so a malformed price anywhere in the file fails the load regardless of where
//! the window would have landed.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::{
    models::{DataPoint, Window},
    random::RandomSource,
};

/// Default number of rows per sampled window.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Errors raised while loading a window from a data file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The data file has no rows.
    #[error("file is empty: {}", path.display())]
    EmptyData {
        /// Path of the empty file.
        path: PathBuf,
    },

    /// The data file has fewer rows than one window needs.
    #[error("file {} has {rows} rows, fewer than the window size {window_size}", path.display())]
    InsufficientData {
        /// Path of the short file.
        path: PathBuf,
        /// Rows actually present.
        rows: usize,
        /// Rows required.
        window_size: usize,
    },

    /// A row could not be turned into a [`DataPoint`].
    #[error("malformed row at {}:{line}: {reason}", path.display())]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// 1-based line number of the row.
        line: u64,
        /// What was wrong with the row.
        reason: String,
    },

    /// Any other I/O failure while reading the file.
    #[error("I/O error reading {}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Whether a batch should log this error and move on to the next sample.
    ///
    /// Only [`LoadError::Io`] is treated as fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LoadError::Io { .. })
    }
}

/// Loads `path` and returns `window_size` consecutive rows starting at a random
/// index in `0..=rows - window_size`.
pub fn load_window<R>(path: &Path, window_size: usize, rng: &mut R) -> Result<Window, LoadError>
where
    R: RandomSource + ?Sized,
{
    let rows = read_rows(path)?;
    let total = rows.len();

    if total == 0 {
        return Err(LoadError::EmptyData {
            path: path.to_path_buf(),
        });
    }
    if total < window_size {
        return Err(LoadError::InsufficientData {
            path: path.to_path_buf(),
            rows: total,
            window_size,
        });
    }

    let start = rng.below(total - window_size + 1);
    debug!(path = %path.display(), start, total, "selected window");

    Ok(rows.into_iter().skip(start).take(window_size).collect())
}

/// Reads and parses every row of `path`. The file is closed before returning.
pub fn read_rows(path: &Path) -> Result<Vec<DataPoint>, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx as u64 + 1;
        let record = record.map_err(|e| csv_error(path, line, e))?;
        let line = record.position().map_or(line, |p| p.line());
        rows.push(parse_row(path, line, &record)?);
    }
    Ok(rows)
}

fn parse_row(path: &Path, line: u64, record: &csv::StringRecord) -> Result<DataPoint, LoadError> {
    let parse_err = |reason: String| LoadError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let (Some(stock_id), Some(timestamp), Some(raw_price)) =
        (record.get(0), record.get(1), record.get(2))
    else {
        return Err(parse_err(format!(
            "expected 3 fields, found {}",
            record.len()
        )));
    };

    let price = raw_price
        .trim()
        .parse::<f64>()
        .map_err(|e| parse_err(format!("invalid price {raw_price:?}: {e}")))?;

    Ok(DataPoint {
        stock_id: stock_id.to_string(),
        timestamp: timestamp.to_string(),
        price,
    })
}

fn csv_error(path: &Path, line: u64, err: csv::Error) -> LoadError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => LoadError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(rows: usize) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for i in 0..rows {
            writeln!(f, "FLTR,{:02}-01-2023,{}", i + 1, 100 + i).unwrap();
        }
        f.flush().unwrap();
        f
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = load_window(Path::new("/definitely/not/here.csv"), 30, &mut rng).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_file_is_empty_data() {
        let f = csv_file(0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = load_window(f.path(), 30, &mut rng).unwrap_err();
        assert!(matches!(err, LoadError::EmptyData { .. }));
    }

    #[test]
    fn short_file_is_insufficient() {
        let f = csv_file(29);
        let mut rng = StdRng::seed_from_u64(0);
        let err = load_window(f.path(), 30, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InsufficientData {
                rows: 29,
                window_size: 30,
                ..
            }
        ));
    }

    #[test]
    fn exact_size_file_yields_whole_file() {
        let f = csv_file(30);
        let mut rng = StdRng::seed_from_u64(3);
        let window = load_window(f.path(), 30, &mut rng).unwrap();
        assert_eq!(window.len(), 30);
        assert_eq!(window[0].timestamp, "01-01-2023");
        assert_eq!(window[29].price, 129.0);
    }

    #[test]
    fn bad_price_is_parse_error() {
        let mut f = csv_file(10);
        writeln!(f, "FLTR,11-01-2023,abc").unwrap();
        f.flush().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = load_window(f.path(), 5, &mut rng).unwrap_err();
        match err {
            LoadError::Parse { line, .. } => assert_eq!(line, 11),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_row_is_parse_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "FLTR,01-01-2023").unwrap();
        f.flush().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = load_window(f.path(), 1, &mut rng).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn last_window_position_is_reachable() {
        let f = csv_file(31);
        let mut rng = StdRng::seed_from_u64(11);
        let saw_last = (0..200).any(|_| {
            let w = load_window(f.path(), 30, &mut rng).unwrap();
            w[0].price == 101.0
        });
        assert!(saw_last);
    }

    proptest! {
        #[test]
        fn window_is_contiguous_and_sized(size in 1usize..40, extra in 0usize..40, seed in any::<u64>()) {
            let f = csv_file(size + extra);
            let mut rng = StdRng::seed_from_u64(seed);
            let w = load_window(f.path(), size, &mut rng).unwrap();
            prop_assert_eq!(w.len(), size);
            for pair in w.windows(2) {
                prop_assert_eq!(pair[1].price - pair[0].price, 1.0);
            }
        }
    }
}
