use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Recorded session to replay.
    pub session: Option<PathBuf>,
    /// Channel numbers; all displayed channels when unset.
    pub channels: Option<Vec<u8>>,
    /// Decimation budget; unbounded when unset.
    pub max_points: Option<usize>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub settle: bool,
}
