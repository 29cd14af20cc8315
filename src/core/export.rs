// CSV export of a capture

use crate::core::error::Result;
use crate::core::format::CaptureResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One row per time index, one column per channel in ascending order.
/// Channels shorter than the axis get empty cells.
pub fn write_csv<W: Write>(writer: W, capture: &CaptureResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Time (s)".to_string()];
    header.extend(capture.channels.keys().map(|c| format!("{} (V)", c.label())));
    wtr.write_record(&header)?;

    let mut row = Vec::with_capacity(header.len());
    for (i, t) in capture.time_axis.as_slice().iter().enumerate() {
        row.clear();
        row.push(format!("{:.10e}", t));
        for samples in capture.channels.values() {
            row.push(match samples.get(i) {
                Some(v) => format!("{:.6e}", v),
                None => String::new(),
            });
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(path: P, capture: &CaptureResult) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(file, capture)?;

    info!(
        "Saved {} samples x {} channel(s) to: {}",
        capture.len(),
        capture.channels.len(),
        path.display()
    );
    Ok(())
}
