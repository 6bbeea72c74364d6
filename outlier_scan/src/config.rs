//! Scan configuration: defaults, TOML loading and validation.
//!
//! Every field is optional in the TOML document; missing fields fall back to
//! [`ScanConfig::default`]. Example:
//!
//! ```toml
//! window_size = 45
//! data_extension = "csv"
//! report_suffix = "_outliers"
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::{loader::DEFAULT_WINDOW_SIZE, report::DEFAULT_REPORT_SUFFIX};

/// Tunables for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Rows per sampled window. Must be at least 2.
    pub window_size: usize,
    /// Extension (without the dot) that marks a data file.
    pub data_extension: String,
    /// Stem suffix of generated reports; files carrying it are never sampled.
    pub report_suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            data_extension: "csv".into(),
            report_suffix: DEFAULT_REPORT_SUFFIX.into(),
        }
    }
}

impl ScanConfig {
    /// Trims fields, strips a leading dot from the extension and checks bounds.
    pub fn normalize(&mut self) -> anyhow::Result<()> {
        if self.window_size < 2 {
            bail!(
                "window_size must be at least 2, got {}",
                self.window_size
            );
        }

        let ext = self.data_extension.trim().trim_start_matches('.');
        if ext.is_empty() {
            bail!("data_extension cannot be empty");
        }
        self.data_extension = ext.to_string();

        let suffix = self.report_suffix.trim();
        if suffix.is_empty() {
            bail!("report_suffix cannot be empty");
        }
        self.report_suffix = suffix.to_string();

        Ok(())
    }
}

/// Parses and normalizes a config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<ScanConfig> {
    let mut cfg: ScanConfig = toml::from_str(toml_str).context("failed to parse scan config TOML")?;
    cfg.normalize().context("invalid scan config")?;
    Ok(cfg)
}

/// Reads a TOML config file from disk. See [`load_config_str`].
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<ScanConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read scan config {}", path.as_ref().display()))?;
    load_config_str(&text)
}
