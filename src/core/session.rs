// Capture loop over an instrument session

use crate::core::block::extract_block;
use crate::core::constants::*;
use crate::core::decoder::WaveformDecoder;
use crate::core::error::{Result, ScopeError};
use crate::core::format::*;
use crate::core::timebase::build_time_axis;
use crate::core::value::ValueParser;
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Command/response link to the oscilloscope.
///
/// Implementations own transport concerns (timeouts, retries, chunking) and
/// return either a complete response or an error.
pub trait Instrument {
    fn query(&mut self, command: &str) -> Result<String>;
    fn write(&mut self, command: &str) -> Result<()>;
    fn read_raw(&mut self) -> Result<Vec<u8>>;
}

impl<I: Instrument + ?Sized> Instrument for &mut I {
    fn query(&mut self, command: &str) -> Result<String> {
        (**self).query(command)
    }

    fn write(&mut self, command: &str) -> Result<()> {
        (**self).write(command)
    }

    fn read_raw(&mut self) -> Result<Vec<u8>> {
        (**self).read_raw()
    }
}

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub parser: ValueParser,
    pub decoder: WaveformDecoder,
    /// Apply the instrument settle delays between commands.
    pub settle: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            parser: ValueParser::default(),
            decoder: WaveformDecoder::default(),
            settle: true,
        }
    }
}

#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: Channel,
    pub error: ScopeError,
}

#[derive(Debug)]
pub struct CaptureReport {
    pub timebase: Timebase,
    pub result: CaptureResult,
    pub failures: Vec<ChannelFailure>,
}

pub struct CaptureSession<I: Instrument> {
    instrument: I,
    options: CaptureOptions,
}

impl<I: Instrument> CaptureSession<I> {
    pub fn new(instrument: I) -> Self {
        Self::with_options(instrument, CaptureOptions::default())
    }

    pub fn with_options(instrument: I, options: CaptureOptions) -> Self {
        Self {
            instrument,
            options,
        }
    }

    pub fn into_inner(self) -> I {
        self.instrument
    }

    fn settle(&self, millis: u64) {
        if self.options.settle {
            thread::sleep(Duration::from_millis(millis));
        }
    }

    fn query_value(&mut self, command: &str) -> Result<f64> {
        let response = self.instrument.query(command)?;
        debug!("{} -> {}", command, response.trim());
        self.options.parser.parse(&response)
    }

    /// Channels whose trace is currently displayed. Falls back to C1.
    pub fn active_channels(&mut self) -> Vec<Channel> {
        let mut active = Vec::new();
        for channel in Channel::all() {
            match self.instrument.query(&format!("{channel}:TRA?")) {
                Ok(resp) if resp.to_uppercase().contains("ON") => active.push(channel),
                Ok(_) => {}
                Err(e) => debug!("{channel}:TRA? failed: {}", e),
            }
        }

        if active.is_empty() {
            info!("No active channels detected. Defaulting to C1.");
            active.extend(Channel::new(MIN_CHANNEL).ok());
        }
        active
    }

    pub fn read_timebase(&mut self) -> Result<Timebase> {
        let seconds_per_division = self.query_value(CMD_TDIV)?;
        let sample_rate = self.query_value(CMD_SARA)?;
        info!(
            "Time base: TDIV={:.3e} s, Sample rate={:.3e} Sa/s",
            seconds_per_division, sample_rate
        );

        Ok(Timebase {
            seconds_per_division,
            sample_rate,
        })
    }

    pub fn read_calibration(&mut self, channel: Channel) -> Result<ChannelCalibration> {
        let scale_volts_per_division = self.query_value(&format!("{channel}:VDIV?"))?;
        let offset_volts = self.query_value(&format!("{channel}:OFST?"))?;
        info!(
            "  {}: VDIV={:.3e} V, OFST={:.3e} V",
            channel, scale_volts_per_division, offset_volts
        );

        Ok(ChannelCalibration {
            scale_volts_per_division,
            offset_volts,
        })
    }

    /// Read back and decode the acquired waveform of one channel.
    pub fn capture_channel(&mut self, channel: Channel) -> Result<ChannelSamples> {
        let calibration = self.read_calibration(channel)?;

        self.instrument.write(CMD_WAVEFORM_SETUP)?;
        self.settle(SETUP_SETTLE_MS);

        self.instrument.write(&format!("{channel}:WF? DAT2"))?;
        self.settle(REQUEST_SETTLE_MS);

        let raw = self.instrument.read_raw()?;
        debug!("{channel}: {} raw bytes", raw.len());

        let block = extract_block(&raw)?;
        Ok(self.options.decoder.decode(&block, &calibration))
    }

    /// Stop acquisition and capture every requested channel.
    ///
    /// A failing channel is recorded in the report and the remaining channels
    /// are still captured. Fails only if the timebase cannot be read or no
    /// channel succeeds.
    pub fn capture(&mut self, channels: &[Channel]) -> Result<CaptureReport> {
        info!(
            "Channels to capture: {}",
            channels.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
        );

        self.instrument.write(CMD_STOP)?;
        self.settle(STOP_SETTLE_MS);

        let timebase = self.read_timebase()?;

        let mut captured = BTreeMap::new();
        let mut failures = Vec::new();

        for &channel in channels {
            info!("Capturing {}...", channel.label());
            match self.capture_channel(channel) {
                Ok(samples) => {
                    info!("  {} points captured", samples.len());
                    captured.insert(channel, samples);
                }
                Err(error) => {
                    warn!("  ERROR on {}: {}", channel.label(), error);
                    failures.push(ChannelFailure { channel, error });
                }
            }
        }

        if captured.is_empty() {
            return Err(ScopeError::NoChannelsCaptured);
        }

        let num_points = captured.values().map(ChannelSamples::len).max().unwrap_or(0);
        let time_axis = build_time_axis(num_points, timebase.sample_rate)?;

        Ok(CaptureReport {
            timebase,
            result: CaptureResult::new(captured, time_axis),
            failures,
        })
    }
}

/// Parse channel numbers, rejecting anything outside C1..C4 and duplicates.
pub fn validate_channels(numbers: &[u8]) -> Result<Vec<Channel>> {
    let mut channels = Vec::with_capacity(numbers.len());
    for &n in numbers {
        let channel = Channel::new(n)?;
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Scripted {
        queries: HashMap<String, String>,
        raw: Vec<Vec<u8>>,
        writes: Vec<String>,
    }

    impl Instrument for Scripted {
        fn query(&mut self, command: &str) -> Result<String> {
            self.queries
                .get(command)
                .cloned()
                .ok_or_else(|| ScopeError::Instrument(format!("no response for {command}")))
        }

        fn write(&mut self, command: &str) -> Result<()> {
            self.writes.push(command.to_string());
            Ok(())
        }

        fn read_raw(&mut self) -> Result<Vec<u8>> {
            if self.raw.is_empty() {
                return Err(ScopeError::Instrument("nothing to read".into()));
            }
            Ok(self.raw.remove(0))
        }
    }

    fn quiet(instrument: Scripted) -> CaptureSession<Scripted> {
        CaptureSession::with_options(
            instrument,
            CaptureOptions {
                settle: false,
                ..CaptureOptions::default()
            },
        )
    }

    #[test]
    fn test_active_channels() {
        let mut scope = Scripted::default();
        scope.queries.insert("C1:TRA?".into(), "C1:TRA OFF".into());
        scope.queries.insert("C2:TRA?".into(), "C2:TRA ON".into());
        scope.queries.insert("C4:TRA?".into(), "c4:tra on".into());

        let mut session = quiet(scope);
        let active: Vec<u8> = session.active_channels().iter().map(|c| c.number()).collect();
        assert_eq!(active, vec![2, 4]);
    }

    #[test]
    fn test_active_channels_default() {
        let mut session = quiet(Scripted::default());
        assert_eq!(session.active_channels(), vec![Channel::new(1).unwrap()]);
    }

    #[test]
    fn test_capture_command_sequence() {
        let mut scope = Scripted::default();
        scope.queries.insert("TDIV?".into(), "TDIV 1.00E-03s".into());
        scope.queries.insert("SARA?".into(), "SARA 1.00E+06Sa/s".into());
        scope.queries.insert("C3:VDIV?".into(), "C3:VDIV 1.00E+00V".into());
        scope.queries.insert("C3:OFST?".into(), "C3:OFST 0.00E+00V".into());
        scope.raw.push(b"C3:WF DAT2,#9000000002\x19\xe6\n\n".to_vec());

        let mut session = quiet(scope);
        let report = session.capture(&validate_channels(&[3]).unwrap()).unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.timebase.sample_rate, 1e6);

        let samples = &report.result.channels[&Channel::new(3).unwrap()];
        assert_eq!(samples.as_slice(), &[1.0, -1.0]);

        let scope = session.into_inner();
        assert_eq!(scope.writes, vec!["STOP", "WFSU SP,1,NP,0,FP,0", "C3:WF? DAT2"]);
    }

    #[test]
    fn test_validate_channels() {
        let channels = validate_channels(&[3, 1, 3]).unwrap();
        assert_eq!(channels.iter().map(|c| c.number()).collect::<Vec<_>>(), vec![3, 1]);
        assert!(matches!(validate_channels(&[1, 5]), Err(ScopeError::InvalidChannel(5))));
    }
}
