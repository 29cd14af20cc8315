use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::{Result, ScopeError};
use crate::core::session::Instrument;

/// On-disk description of a recorded session.
///
/// ```json
/// {
///   "queries": { "TDIV?": "TDIV 1.00E-03s", "SARA?": "SARA 500MSa/s" },
///   "raw": { "C1:WF? DAT2": "c1_dat2.bin" }
/// }
/// ```
///
/// Raw paths are resolved relative to the session file.
#[derive(Debug, Default, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub queries: HashMap<String, String>,
    #[serde(default)]
    pub raw: HashMap<String, PathBuf>,
}

/// Plays back recorded responses as an [`Instrument`].
#[derive(Debug, Default)]
pub struct ReplayInstrument {
    queries: HashMap<String, String>,
    raw: HashMap<String, Vec<u8>>,
    pending: Option<Vec<u8>>,
    writes: Vec<String>,
}

impl ReplayInstrument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let session: SessionFile = serde_json::from_str(&data).map_err(|e| {
            ScopeError::Config(format!("session {}: {e}", path.display()))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut replay = Self::new();
        replay.queries = session.queries;

        for (command, file) in session.raw {
            let bytes = fs::read(base.join(&file))?;
            debug!("Loaded {} bytes for {} from {}", bytes.len(), command, file.display());
            replay.raw.insert(command, bytes);
        }

        info!(
            "Replay session {}: {} queries, {} raw responses",
            path.display(),
            replay.queries.len(),
            replay.raw.len()
        );
        Ok(replay)
    }

    pub fn with_query(mut self, command: impl Into<String>, response: impl Into<String>) -> Self {
        self.queries.insert(command.into(), response.into());
        self
    }

    pub fn with_raw(mut self, command: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.raw.insert(command.into(), bytes.into());
        self
    }

    /// Commands written so far, in order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Instrument for ReplayInstrument {
    fn query(&mut self, command: &str) -> Result<String> {
        self.queries
            .get(command)
            .cloned()
            .ok_or_else(|| ScopeError::Instrument(format!("no recorded response for {command:?}")))
    }

    fn write(&mut self, command: &str) -> Result<()> {
        if let Some(bytes) = self.raw.get(command) {
            self.pending = Some(bytes.clone());
        }
        self.writes.push(command.to_string());
        Ok(())
    }

    fn read_raw(&mut self) -> Result<Vec<u8>> {
        self.pending
            .take()
            .ok_or_else(|| ScopeError::Instrument("no raw response pending".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_is_armed_by_write() {
        let mut scope = ReplayInstrument::new().with_raw("C1:WF? DAT2", b"#9000000000".to_vec());

        assert!(scope.read_raw().is_err());
        scope.write("STOP").unwrap();
        assert!(scope.read_raw().is_err());

        scope.write("C1:WF? DAT2").unwrap();
        assert_eq!(scope.read_raw().unwrap(), b"#9000000000");
        assert!(scope.read_raw().is_err());
        assert_eq!(scope.writes(), &["STOP", "C1:WF? DAT2"]);
    }

    #[test]
    fn test_unknown_query() {
        let mut scope = ReplayInstrument::new().with_query("TDIV?", "TDIV 1.00E-03s");
        assert_eq!(scope.query("TDIV?").unwrap(), "TDIV 1.00E-03s");
        assert!(matches!(scope.query("SARA?"), Err(ScopeError::Instrument(_))));
    }
}
