use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use outlier_scan::{
    config::{ScanConfig, load_config_path},
    scan::Scanner,
    summary::BatchSummary,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::Level;

#[derive(Parser)]
#[command(version, about = "Sample random windows of exchange price files and report outliers")]
struct Cli {
    /// Exchange folders holding the price CSV files; each folder is one exchange
    #[arg(required = true, value_name = "FOLDER")]
    folders: Vec<PathBuf>,

    /// Number of files to sample per exchange
    #[arg(short, long, default_value_t = 1)]
    num_files: usize,

    /// Rows per sampled window (overrides the config file)
    #[arg(long)]
    window_size: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML scan config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => ScanConfig::default(),
    };
    if let Some(window_size) = cli.window_size {
        config.window_size = window_size;
        config.normalize().context("invalid --window-size")?;
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let scanner = Scanner::new(config);
    let mut summary = BatchSummary::default();
    for folder in &cli.folders {
        let results = scanner
            .run(folder, cli.num_files, &mut rng)
            .with_context(|| format!("scan of {} failed", folder.display()))?;
        summary.extend(&results);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}
