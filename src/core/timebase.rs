// Time axis construction and fixed-stride decimation

use crate::core::error::{Result, ScopeError};
use crate::core::format::TimeAxis;

/// `n` timestamps `t_i = (i - n/2) / sample_rate`, so the trigger sits at the
/// middle sample. `n/2` is not truncated, odd lengths stay centred.
pub fn build_time_axis(n: usize, sample_rate: f64) -> Result<TimeAxis> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(ScopeError::InvalidRate(sample_rate));
    }

    let half = n as f64 / 2.0;
    Ok(TimeAxis::new(
        (0..n).map(|i| (i as f64 - half) / sample_rate).collect(),
    ))
}

/// Stride that brings `n` points down to about `max_points`, or `None` when no
/// decimation is needed. Floor division, so the output can exceed the budget
/// by less than one stride.
pub fn decimation_stride(n: usize, max_points: Option<usize>) -> Option<usize> {
    let max_points = max_points.filter(|&m| m > 0)?;
    if n <= max_points {
        return None;
    }
    Some((n / max_points).max(1))
}

/// Keep indices `0, stride, 2*stride, ...`. Picks samples, no averaging or
/// anti-alias filtering.
pub fn decimate<T: Copy>(samples: &[T], stride: usize) -> Vec<T> {
    samples.iter().step_by(stride.max(1)).copied().collect()
}
