#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use outlier_scan::random::RandomSource;
use tempfile::TempDir;

/// An exchange folder inside a temp dir, e.g. `<tmp>/NYSE`.
pub struct Exchange {
    _dir: TempDir, // keep alive for the life of the test
    pub path: PathBuf,
}

pub fn exchange(name: &str) -> Exchange {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(name);
    fs::create_dir(&path).expect("exchange dir");
    Exchange { _dir: dir, path }
}

impl Exchange {
    /// Writes `<name>.csv` with one row per price.
    pub fn write_prices(&self, name: &str, stock_id: &str, prices: &[f64]) -> PathBuf {
        let body: String = prices
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{stock_id},{:02}-01-2024 09:{:02},{p}\n", i % 28 + 1, i % 60))
            .collect();
        self.write_raw(&format!("{name}.csv"), &body)
    }

    pub fn write_raw(&self, file_name: &str, body: &str) -> PathBuf {
        let path = self.path.join(file_name);
        fs::write(&path, body).expect("write fixture");
        path
    }
}

/// 30 prices at 100.0 with a 500.0 spike at `spike_at`.
pub fn spiked_prices(spike_at: usize) -> Vec<f64> {
    let mut prices = vec![100.0; 30];
    prices[spike_at] = 500.0;
    prices
}

pub fn read_report(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open report");
    reader
        .records()
        .map(|r| r.expect("record").iter().map(str::to_string).collect())
        .collect()
}

/// Replays a fixed list of indices, clamped to the requested bound.
pub struct Scripted(VecDeque<usize>);

impl Scripted {
    pub fn new(picks: &[usize]) -> Self {
        Self(picks.iter().copied().collect())
    }
}

impl RandomSource for Scripted {
    fn below(&mut self, upper: usize) -> usize {
        self.0.pop_front().unwrap_or(0).min(upper - 1)
    }
}
