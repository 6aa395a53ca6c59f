//! Delta encoding of per-batch timestamps and L1 proof heights.
//!
//! Both vectors compress well because consecutive batches are seconds apart and anchor to
//! consecutive L1 blocks. The interpretation is positional and must be identical on both
//! sides: `time_deltas[0]` is a placeholder of zero (the start time carries batch 0's
//! timestamp absolutely), while `l1_height_deltas[0]` is the absolute height of batch 0's
//! proof and every later entry is a signed delta from its predecessor.

use crate::CodecError;

/// Computes the per-batch time deltas for the given monotone timestamps.
pub fn time_deltas(times: &[u64]) -> Result<Vec<i64>, CodecError> {
    let mut deltas = Vec::with_capacity(times.len());
    let mut prev = *times.first().ok_or(CodecError::EmptyInput)?;
    for &time in times {
        let delta = time.checked_sub(prev).ok_or(CodecError::NegativeTimeDelta)?;
        deltas.push(i64::try_from(delta).map_err(|_| CodecError::Overflow)?);
        prev = time;
    }
    Ok(deltas)
}

/// Recovers the absolute per-batch timestamps from the start time and the deltas.
pub fn recover_times(start_time: u64, deltas: &[i64]) -> Result<Vec<u64>, CodecError> {
    let mut times = Vec::with_capacity(deltas.len());
    let mut current = start_time;
    for &delta in deltas {
        if delta < 0 {
            return Err(CodecError::NegativeTimeDelta);
        }
        current = current.checked_add(delta as u64).ok_or(CodecError::Overflow)?;
        times.push(current);
    }
    Ok(times)
}

/// Computes the L1 height vector for the given per-batch proof heights: the absolute height
/// first, then signed deltas. A delta may be negative when an L1 reorg lowered the proof
/// height between batches.
pub fn l1_height_deltas(heights: &[u64]) -> Result<Vec<i64>, CodecError> {
    let mut deltas = Vec::with_capacity(heights.len());
    let first = *heights.first().ok_or(CodecError::EmptyInput)?;
    deltas.push(i64::try_from(first).map_err(|_| CodecError::Overflow)?);
    for window in heights.windows(2) {
        let delta = window[1] as i128 - window[0] as i128;
        deltas.push(i64::try_from(delta).map_err(|_| CodecError::Overflow)?);
    }
    Ok(deltas)
}

/// Recovers the absolute per-batch L1 proof heights from the delta vector.
pub fn recover_l1_heights(deltas: &[i64]) -> Result<Vec<u64>, CodecError> {
    let mut heights = Vec::with_capacity(deltas.len());
    let mut current: i128 = 0;
    for (idx, &delta) in deltas.iter().enumerate() {
        current = if idx == 0 { delta as i128 } else { current + delta as i128 };
        let height = u64::try_from(current).map_err(|_| CodecError::NegativeL1Height(idx))?;
        heights.push(height);
    }
    Ok(heights)
}
