//! # vthresh CLI
//!
//! Command-line front-end for the threshold-voltage extraction pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Full instantaneous analysis (IV curves, tangent lines, derivatives)
//! vthresh Data/Ba133_uniradiated_linear.xml
//!
//! # Threshold-vs-time chart from the second-derivative estimator
//! vthresh Data/Ba133_uniradiated_linear.xml --dvt-over-time
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use vthresh::config::{AnalysisConfig, AnalysisConfigFlags, ConfigFile};
use vthresh::estimate::{
    second_derivative_peak, steepest_slope, SteepestSlopeFit, ThresholdEstimate,
};
use vthresh::loader::load_sweeps;
use vthresh::plot::{output_path, render_iv_chart, render_time_chart};

/// vthresh - MOSFET Threshold-Voltage Extraction
#[derive(Parser)]
#[command(name = "vthresh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input measurement XML file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory for the output image (defaults next to the input file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Optional TOML config file supplying analysis defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render the raw error-bar IV curves
    #[arg(long)]
    iv_graph: bool,

    /// Run the steepest-slope estimator and render its tangent lines
    #[arg(long)]
    steepest_line: bool,

    /// Run the second-derivative estimator and render its scaled curves
    #[arg(long)]
    derivative: bool,

    /// Plot second-derivative threshold estimates against sweep index
    #[arg(long)]
    dvt_over_time: bool,

    /// Plot steepest-slope threshold estimates against sweep index
    #[arg(long)]
    lvt_over_time: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let file_config = match cli.config.as_ref() {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };
    let flags = AnalysisConfigFlags {
        iv_graph: cli.iv_graph,
        steepest_line: cli.steepest_line,
        derivative: cli.derivative,
        dvt_over_time: cli.dvt_over_time,
        lvt_over_time: cli.lvt_over_time,
    };
    let config = AnalysisConfig::resolve(&file_config.analysis, &flags);
    // Validate the selection before any loading or file I/O.
    config.validate()?;

    if !cli.input.exists() {
        anyhow::bail!("Input file does not exist: {}", cli.input.display());
    }

    info!("Input: {}", cli.input.display());
    let series = load_sweeps(&cli.input).context("Failed to parse measurement document")?;
    info!("Loaded {} sweep(s)", series.len());

    // Per-sweep estimates; a failed sweep is logged and skipped while the
    // rest of the series continues.
    let mut steepest: Vec<Option<SteepestSlopeFit>> = Vec::with_capacity(series.len());
    let mut peaks: Vec<Option<ThresholdEstimate>> = Vec::with_capacity(series.len());
    for (i, sweep) in series.iter().enumerate() {
        if config.needs_steepest() {
            match steepest_slope(sweep) {
                Ok(fit) => {
                    println!(
                        "Threshold voltage: {} +/- {}",
                        fit.estimate.volts, fit.estimate.error
                    );
                    steepest.push(Some(fit));
                }
                Err(e) => {
                    warn!("sweep {}: steepest-slope estimate skipped: {}", i, e);
                    steepest.push(None);
                }
            }
        } else {
            steepest.push(None);
        }

        if config.needs_peak() {
            match second_derivative_peak(sweep) {
                Ok(estimate) => {
                    println!(
                        "Second Derivative Maximum: {} +/- {}",
                        estimate.volts, estimate.error
                    );
                    peaks.push(Some(estimate));
                }
                Err(e) => {
                    warn!("sweep {}: second-derivative estimate skipped: {}", i, e);
                    peaks.push(None);
                }
            }
        } else {
            peaks.push(None);
        }
    }

    if let Some(dir) = cli.output_dir.as_ref() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }
    let out = output_path(&cli.input, cli.output_dir.as_deref(), config.mode_suffix());

    if config.instantaneous() {
        render_iv_chart(&out, &series, &steepest, &config).context("Failed to render IV chart")?;
    } else {
        render_time_chart(&out, &steepest, &peaks, &config)
            .context("Failed to render threshold-vs-time chart")?;
    }
    info!("Wrote plot: {}", out.display());

    Ok(())
}
