// Siglent waveform capture
// Library entry point: decode pipeline, capture loop and export

pub mod client;
pub mod core;

// Re-export main types
pub use crate::client::replay::ReplayInstrument;
pub use crate::core::block::extract_block;
pub use crate::core::decoder::WaveformDecoder;
pub use crate::core::error::{FramingError, Result, ScopeError};
pub use crate::core::export::{save_csv, write_csv};
pub use crate::core::format::{
    CaptureResult, Channel, ChannelCalibration, ChannelSamples, RawBlock, TimeAxis, Timebase,
};
pub use crate::core::session::{
    validate_channels, CaptureOptions, CaptureReport, CaptureSession, ChannelFailure, Instrument,
};
pub use crate::core::timebase::{build_time_axis, decimate, decimation_stride};
pub use crate::core::value::{parse_value, UnitTable, ValueParser};
