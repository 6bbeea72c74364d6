//! Windowed outlier scanning over per-exchange stock price CSV files.
//!
//! A scan picks files from an exchange folder at random, cuts a random
//! contiguous window out of each, flags prices that sit more than two sample
//! standard deviations from the window mean and writes a `<stem>_outliers.csv`
//! report next to the source file.
//!
//! ```no_run
//! use rand::{SeedableRng, rngs::StdRng};
//! use outlier_scan::{config::ScanConfig, scan::run};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let results = run("data/NASDAQ", 3, &ScanConfig::default(), &mut rng).expect("scan");
//! println!("{} samples processed", results.len());
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod detector;
pub mod loader;
pub mod models;
pub mod random;
pub mod report;
pub mod scan;
pub mod summary;
