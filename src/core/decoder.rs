// DAT2 sample codes to calibrated voltages

use crate::core::constants::CODES_PER_DIVISION;
use crate::core::format::{ChannelCalibration, ChannelSamples, RawBlock};

/// Converts waveform bytes for one instrument family.
///
/// Sample bytes are NOT centred on 128. Bytes `0..=127` are the codes
/// `0..=127` and bytes `128..=255` wrap to `byte - 255`, i.e. `-127..=0`.
/// Subtracting 128 instead yields full-scale spikes around zero crossings
/// and distorted edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformDecoder {
    codes_per_division: f64,
}

impl WaveformDecoder {
    pub fn new(codes_per_division: f64) -> Self {
        Self { codes_per_division }
    }

    /// Signed vertical code for one sample byte.
    pub fn sample_code(byte: u8) -> i16 {
        if byte > 127 {
            i16::from(byte) - 255
        } else {
            i16::from(byte)
        }
    }

    pub fn voltage(&self, byte: u8, calibration: &ChannelCalibration) -> f64 {
        let divisions = f64::from(Self::sample_code(byte)) / self.codes_per_division;
        divisions * calibration.scale_volts_per_division - calibration.offset_volts
    }

    /// One voltage per payload byte, in order.
    pub fn decode(&self, block: &RawBlock, calibration: &ChannelCalibration) -> ChannelSamples {
        ChannelSamples::new(
            block
                .as_bytes()
                .iter()
                .map(|&b| self.voltage(b, calibration))
                .collect(),
        )
    }
}

impl Default for WaveformDecoder {
    fn default() -> Self {
        Self::new(CODES_PER_DIVISION)
    }
}
