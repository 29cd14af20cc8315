use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::capture_config::CaptureConfig;
use crate::Args;

pub fn load_config(file_path: &Path) -> Result<CaptureConfig, String> {
    let data = fs::read_to_string(file_path)
        .map_err(|e| format!("File read Error: {e} {}", file_path.display()))?;

    let config: CaptureConfig =
        serde_json::from_str(&data).map_err(|e| format!("JSON Parse Error: {e}"))?;

    info!("Config loaded from {}", file_path.display());
    Ok(config)
}

/// Config file (if any) with command-line flags layered on top.
pub fn resolve_config(args: &Args) -> Result<CaptureConfig, String> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CaptureConfig::default(),
    };

    if args.session.is_some() {
        config.session = args.session.clone();
    }
    if let Some(channels) = &args.channels {
        config.channels = Some(channels.clone());
    }
    if args.max_points.is_some() {
        config.max_points = args.max_points;
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    config.settle |= args.settle;

    if config.max_points == Some(0) {
        return Err("max_points must be a positive integer".to_string());
    }
    if matches!(&config.channels, Some(c) if c.is_empty()) {
        return Err("channel list is empty".to_string());
    }

    Ok(config)
}

/// `scope_<YYYYmmdd_HHMMSS>.csv` in the working directory.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("scope_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
}
