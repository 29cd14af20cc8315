use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use scope_capture::{
    save_csv, validate_channels, CaptureOptions, CaptureSession, ReplayInstrument,
};

mod models;
mod utils;

use crate::utils::conf_helper::{default_output_path, resolve_config};

/// Decode a Siglent SDS1000X-E waveform capture to CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Recorded session (JSON) to replay
    #[arg(short, long)]
    pub session: Option<PathBuf>,

    /// Comma-separated channel numbers, e.g. "1,3" (default: all displayed)
    #[arg(short, long, value_delimiter = ',')]
    pub channels: Option<Vec<u8>>,

    /// Max number of points in the CSV (evenly decimates if needed)
    #[arg(short = 'n', long)]
    pub max_points: Option<usize>,

    /// Output CSV path (default: scope_<timestamp>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Wait for the instrument to settle between commands
    #[arg(long)]
    pub settle: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = resolve_config(&args).map_err(anyhow::Error::msg)?;

    // Reject bad channel numbers before talking to the instrument
    let requested = config
        .channels
        .as_deref()
        .map(validate_channels)
        .transpose()?;

    let session_path = config
        .session
        .as_ref()
        .context("no session given (use --session or the config file)")?;
    let instrument = ReplayInstrument::open(session_path)
        .with_context(|| format!("opening session {}", session_path.display()))?;

    let mut session = CaptureSession::with_options(
        instrument,
        CaptureOptions {
            settle: config.settle,
            ..CaptureOptions::default()
        },
    );

    let channels = match requested {
        Some(channels) => channels,
        None => session.active_channels(),
    };

    let mut report = session.capture(&channels)?;

    let num_points = report.result.len();
    if let Some(skip) = report.result.decimate(config.max_points) {
        info!(
            "Decimated: keeping every {}th sample ({} -> {} points)",
            skip,
            num_points,
            report.result.len()
        );
    }

    let output = config.output.clone().unwrap_or_else(default_output_path);
    save_csv(&output, &report.result)
        .with_context(|| format!("writing {}", output.display()))?;

    if !report.failures.is_empty() {
        info!("{} channel(s) failed", report.failures.len());
    }
    info!("Done!");
    Ok(())
}
