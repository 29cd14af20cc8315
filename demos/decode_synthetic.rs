// Example usage: capture a synthetic two-channel waveform without hardware

use scope_capture::{
    save_csv, validate_channels, CaptureOptions, CaptureSession, ReplayInstrument, Result,
};
use tracing::{info, Level};

fn dat2_response(channel: u8, codes: &[u8]) -> Vec<u8> {
    let mut raw = format!("C{}:WF DAT2,#9{:09}", channel, codes.len()).into_bytes();
    raw.extend_from_slice(codes);
    raw.extend_from_slice(b"\n\n");
    raw
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Triangle wave spanning +-100 codes (4 divisions)
    let triangle: Vec<u8> = (0..2000i32)
        .map(|i| {
            let code = 100 - ((i % 400) - 200).abs();
            if code < 0 {
                (code + 255) as u8
            } else {
                code as u8
            }
        })
        .collect();
    // Square wave at +-50 codes
    let square: Vec<u8> = (0..2000)
        .map(|i| if (i / 250) % 2 == 0 { 50 } else { 205 })
        .collect();

    let scope = ReplayInstrument::new()
        .with_query("TDIV?", "TDIV 2.00E-04s")
        .with_query("SARA?", "SARA 1.00MSa/s")
        .with_query("C1:VDIV?", "C1:VDIV 5.00E-01V")
        .with_query("C1:OFST?", "C1:OFST 0.00E+00V")
        .with_query("C2:VDIV?", "C2:VDIV 1.00E+00V")
        .with_query("C2:OFST?", "C2:OFST -5.00E-01V")
        .with_raw("C1:WF? DAT2", dat2_response(1, &triangle))
        .with_raw("C2:WF? DAT2", dat2_response(2, &square));

    let mut session = CaptureSession::with_options(
        scope,
        CaptureOptions {
            settle: false,
            ..CaptureOptions::default()
        },
    );

    let mut report = session.capture(&validate_channels(&[1, 2])?)?;
    info!("Captured {} points", report.result.len());

    if let Some(skip) = report.result.decimate(Some(500)) {
        info!("Decimated by {} to {} points", skip, report.result.len());
    }

    for (channel, samples) in &report.result.channels {
        let min = samples.as_slice().iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.as_slice().iter().copied().fold(f64::NEG_INFINITY, f64::max);
        info!("{}: {:.3} V .. {:.3} V", channel.label(), min, max);
    }

    save_csv("synthetic_capture.csv", &report.result)?;
    Ok(())
}
