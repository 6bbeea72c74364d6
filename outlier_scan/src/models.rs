//! Plain data carried between the scan stages.

use serde::Serialize;

/// A single parsed row of an exchange CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    /// Ticker or instrument identifier (first column).
    pub stock_id: String,
    /// Timestamp exactly as it appears in the file; never parsed.
    pub timestamp: String,
    /// Price parsed from the third column.
    pub price: f64,
}

/// Contiguous run of rows cut from one file, in file order.
pub type Window = Vec<DataPoint>;

/// A flagged data point together with the window statistics that flagged it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRecord {
    /// Identifier copied from the flagged point.
    pub stock_id: String,
    /// Timestamp copied from the flagged point.
    pub timestamp: String,
    /// The flagged price.
    pub actual_price: f64,
    /// Arithmetic mean of the window the point was drawn from.
    pub mean: f64,
    /// `|actual_price - mean|`.
    pub difference: f64,
    /// `difference / mean * 100`.
    pub percent_deviation: f64,
}

impl OutlierRecord {
    /// Builds a record for `point` against a window mean.
    ///
    /// Callers must ensure `mean` is non-zero.
    pub fn new(point: &DataPoint, mean: f64) -> Self {
        let difference = (point.price - mean).abs();
        Self {
            stock_id: point.stock_id.clone(),
            timestamp: point.timestamp.clone(),
            actual_price: point.price,
            mean,
            difference,
            percent_deviation: difference / mean * 100.0,
        }
    }
}

/// Outcome of one successful sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleResult {
    /// Exchange label derived from the scanned folder name.
    pub exchange: String,
    /// Outliers found in the sampled window, in window order.
    pub outliers: Vec<OutlierRecord>,
}
