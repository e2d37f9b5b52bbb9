use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dominopips::{process_folder, DebugConfig, PipDetector, PipThresholds};

#[derive(Parser)]
#[command(name = "dominopips")]
#[command(about = "Count the pips on binarized domino images")]
struct Cli {
    /// Folder of black/white domino images
    #[arg(value_name = "FOLDER", default_value = "pics")]
    folder: PathBuf,

    /// Smallest pip radius in pixels
    #[arg(long, value_name = "PX", default_value_t = 5)]
    min_radius: u32,

    /// Largest pip radius in pixels
    #[arg(long, value_name = "PX", default_value_t = 50)]
    max_radius: u32,

    /// Circularity a contour must exceed to count as a pip
    #[arg(long, value_name = "RATIO", default_value_t = 0.8)]
    circularity: f64,

    /// Do not write debug images
    #[arg(long)]
    no_debug: bool,

    /// Log every contour decision
    #[arg(short, long)]
    verbose: bool,
}

/// `RUST_LOG` when set and valid, `info` otherwise; `--verbose` always adds debug output for this crate
fn log_filter(verbose: bool, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    if verbose {
        Ok(filter.add_directive("dominopips=debug".parse()?))
    } else {
        Ok(filter)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(args.verbose, rust_log.as_deref())?)
        .init();

    let thresholds = PipThresholds::new()
        .with_min_radius(args.min_radius)
        .with_max_radius(args.max_radius)
        .with_circularity_threshold(args.circularity);
    thresholds.validate()?;

    let debug = DebugConfig {
        enabled: !args.no_debug,
        ..DebugConfig::default()
    };

    let detector = PipDetector::new()
        .with_thresholds(thresholds)
        .with_debug(debug);

    let stdout = std::io::stdout();
    process_folder(&args.folder, &detector, &mut stdout.lock())
        .with_context(|| format!("Failed to process {}", args.folder.display()))?;

    Ok(())
}
