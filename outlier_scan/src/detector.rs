//! Flags window prices that sit more than two sample standard deviations
//! from the window mean.

use thiserror::Error;

use crate::models::{DataPoint, OutlierRecord};

/// Width of the outlier band, in sample standard deviations.
pub const THRESHOLD_STDEVS: f64 = 2.0;

/// Errors raised while computing window statistics.
#[derive(Debug, Error, PartialEq)]
pub enum DetectError {
    /// Fewer than two points; the sample standard deviation is undefined.
    #[error("window has {len} points, at least 2 are needed for a standard deviation")]
    InsufficientSample {
        /// Number of points in the window.
        len: usize,
    },

    /// The window mean is zero, so a percent deviation cannot be computed.
    #[error("window mean is zero, percent deviation is undefined")]
    DegenerateStatistics,
}

/// Summary statistics of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Arithmetic mean of the prices.
    pub mean: f64,
    /// Bessel-corrected sample standard deviation of the prices.
    pub stdev: f64,
}

impl WindowStats {
    /// Deviation above which a price is an outlier.
    pub fn threshold(&self) -> f64 {
        THRESHOLD_STDEVS * self.stdev
    }

    /// Strictly greater than the threshold; points sitting exactly on it are kept.
    pub fn is_outlier(&self, price: f64) -> bool {
        (price - self.mean).abs() > self.threshold()
    }
}

/// Computes mean and sample standard deviation over the window's prices.
pub fn window_stats(window: &[DataPoint]) -> Result<WindowStats, DetectError> {
    let len = window.len();
    if len < 2 {
        return Err(DetectError::InsufficientSample { len });
    }

    let n = len as f64;
    let mean = window.iter().map(|p| p.price).sum::<f64>() / n;
    let sq_diff: f64 = window.iter().map(|p| (p.price - mean).powi(2)).sum();
    let stdev = (sq_diff / (n - 1.0)).sqrt();

    Ok(WindowStats { mean, stdev })
}

/// Returns one [`OutlierRecord`] per flagged point, in window order.
///
/// A zero mean is only an error when at least one point is flagged, since that
/// is the only case where a percent deviation has to be produced.
pub fn detect(window: &[DataPoint]) -> Result<Vec<OutlierRecord>, DetectError> {
    let stats = window_stats(window)?;

    let flagged: Vec<&DataPoint> = window
        .iter()
        .filter(|p| stats.is_outlier(p.price))
        .collect();

    if !flagged.is_empty() && stats.mean == 0.0 {
        return Err(DetectError::DegenerateStatistics);
    }

    Ok(flagged
        .into_iter()
        .map(|p| OutlierRecord::new(p, stats.mean))
        .collect())
}
