//! Per-exchange roll-up of a batch of sample results.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::SampleResult;

/// Totals for one exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeSummary {
    /// Samples that completed.
    pub samples: usize,
    /// Outliers across all completed samples.
    pub outliers: usize,
    /// Largest absolute percent deviation seen, if any outlier was found.
    pub max_percent_deviation: Option<f64>,
}

/// Results grouped by exchange, in the order exchanges were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchSummary {
    exchanges: IndexMap<String, ExchangeSummary>,
}

impl BatchSummary {
    /// Folds a batch into per-exchange totals.
    pub fn from_results(results: &[SampleResult]) -> Self {
        let mut summary = Self::default();
        summary.extend(results);
        summary
    }

    /// Adds more results to the running totals.
    pub fn extend(&mut self, results: &[SampleResult]) {
        for result in results {
            let entry = self.exchanges.entry(result.exchange.clone()).or_default();
            entry.samples += 1;
            entry.outliers += result.outliers.len();
            for rec in &result.outliers {
                let pct = rec.percent_deviation.abs();
                entry.max_percent_deviation = Some(match entry.max_percent_deviation {
                    Some(cur) => cur.max(pct),
                    None => pct,
                });
            }
        }
    }

    /// Totals for one exchange.
    pub fn get(&self, exchange: &str) -> Option<&ExchangeSummary> {
        self.exchanges.get(exchange)
    }

    /// Exchanges and their totals, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExchangeSummary)> {
        self.exchanges.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when no sample completed.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (exchange, s) in self.iter() {
            write!(f, "{exchange}: {} samples, {} outliers", s.samples, s.outliers)?;
            if let Some(max) = s.max_percent_deviation {
                write!(f, ", max deviation {max:.2}%")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
