// Data structures for a single capture run

use crate::core::constants::{MAX_CHANNEL, MIN_CHANNEL};
use crate::core::error::{Result, ScopeError};
use crate::core::timebase::{decimate, decimation_stride};
use std::collections::BTreeMap;
use std::fmt;

/// Analog input channel, `C1`..`C4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    pub fn new(number: u8) -> Result<Self> {
        if (MIN_CHANNEL..=MAX_CHANNEL).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ScopeError::InvalidChannel(number))
        }
    }

    pub fn all() -> impl Iterator<Item = Channel> {
        (MIN_CHANNEL..=MAX_CHANNEL).map(Channel)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Column label used in exports, e.g. `CH2`.
    pub fn label(self) -> String {
        format!("CH{}", self.0)
    }
}

// SCPI header form, e.g. `C2`
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Vertical settings read back for one channel. Read fresh every capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCalibration {
    pub scale_volts_per_division: f64,
    pub offset_volts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timebase {
    pub seconds_per_division: f64,
    pub sample_rate: f64,
}

/// Payload of a definite-length block, exactly as long as its header declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock(Vec<u8>);

impl RawBlock {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Calibrated voltages for one channel in acquisition order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSamples(Vec<f64>);

impl ChannelSamples {
    pub fn new(volts: Vec<f64>) -> Self {
        Self(volts)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trigger-centered timestamps in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis(Vec<f64>);

impl TimeAxis {
    pub(crate) fn new(times: Vec<f64>) -> Self {
        Self(times)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub channels: BTreeMap<Channel, ChannelSamples>,
    pub time_axis: TimeAxis,
}

impl CaptureResult {
    pub fn new(channels: BTreeMap<Channel, ChannelSamples>, time_axis: TimeAxis) -> Self {
        Self {
            channels,
            time_axis,
        }
    }

    pub fn len(&self) -> usize {
        self.time_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty()
    }

    /// Longest channel, which is also the length the time axis is built for.
    pub fn max_channel_len(&self) -> usize {
        self.channels.values().map(ChannelSamples::len).max().unwrap_or(0)
    }

    /// Thin the axis and every channel to roughly `max_points` using a fixed
    /// stride. Lossy: samples are picked, not averaged. Returns the stride used,
    /// or `None` when the data already fits.
    pub fn decimate(&mut self, max_points: Option<usize>) -> Option<usize> {
        let stride = decimation_stride(self.time_axis.len(), max_points)?;

        self.time_axis = TimeAxis(decimate(&self.time_axis.0, stride));
        for samples in self.channels.values_mut() {
            *samples = ChannelSamples(decimate(&samples.0, stride));
        }

        Some(stride)
    }
}
