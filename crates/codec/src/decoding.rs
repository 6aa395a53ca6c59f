//! Canonical decoding primitives, the inverses of [`crate::encoding`]. Every reader advances
//! the buffer past the value it consumed and rejects non-canonical encodings.

use crate::CodecError;
use alloy_primitives::{bytes::Buf, U256};
use veil_primitives::from_be_bytes_slice_and_advance_buf;

/// Reads a fixed-width big-endian u64.
pub fn get_u64(buf: &mut &[u8]) -> Result<u64, CodecError> {
    if buf.len() < 8 {
        return Err(CodecError::Eof);
    }
    Ok(from_be_bytes_slice_and_advance_buf!(u64, buf))
}

/// Reads a length-prefixed byte string.
pub fn get_bytes<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], CodecError> {
    let len = get_seq_len(buf)?;
    if buf.len() < len {
        return Err(CodecError::Eof);
    }
    let (bytes, rest) = buf.split_at(len);
    *buf = rest;
    Ok(bytes)
}

/// Reads a sequence length prefix.
pub fn get_seq_len(buf: &mut &[u8]) -> Result<usize, CodecError> {
    if buf.len() < 4 {
        return Err(CodecError::Eof);
    }
    Ok(from_be_bytes_slice_and_advance_buf!(u32, buf) as usize)
}

/// Reads a sign-and-magnitude big integer, rejecting non-canonical forms: a sign byte other
/// than 0 or 1, a magnitude with leading zero bytes, or a negative zero.
pub fn get_bigint(buf: &mut &[u8]) -> Result<(bool, U256), CodecError> {
    if buf.is_empty() {
        return Err(CodecError::Eof);
    }
    let sign = buf[0];
    buf.advance(1);
    if sign > 1 {
        return Err(CodecError::NonCanonicalInteger);
    }

    let magnitude = get_bytes(buf)?;
    if magnitude.len() > 32 {
        return Err(CodecError::Overflow);
    }
    if magnitude.first() == Some(&0) {
        return Err(CodecError::NonCanonicalInteger);
    }
    if magnitude.is_empty() && sign == 1 {
        return Err(CodecError::NonCanonicalInteger);
    }

    Ok((sign == 1, U256::from_be_slice(magnitude)))
}

/// Reads a non-negative big integer into a u64.
pub fn get_uint(buf: &mut &[u8]) -> Result<u64, CodecError> {
    let (negative, magnitude) = get_bigint(buf)?;
    if negative {
        return Err(CodecError::UnexpectedNegative);
    }
    magnitude.try_into().map_err(|_| CodecError::Overflow)
}

/// Reads a non-negative big integer of up to 256 bits.
pub fn get_ubig(buf: &mut &[u8]) -> Result<U256, CodecError> {
    let (negative, magnitude) = get_bigint(buf)?;
    if negative {
        return Err(CodecError::UnexpectedNegative);
    }
    Ok(magnitude)
}

/// Reads a signed big integer into an i64.
pub fn get_int(buf: &mut &[u8]) -> Result<i64, CodecError> {
    let (negative, magnitude) = get_bigint(buf)?;
    let magnitude: u64 = magnitude.try_into().map_err(|_| CodecError::Overflow)?;
    if magnitude > i64::MAX as u64 {
        return Err(CodecError::Overflow);
    }
    Ok(if negative { -(magnitude as i64) } else { magnitude as i64 })
}
