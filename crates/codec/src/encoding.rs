//! Canonical encoding primitives: fixed-width integers, length-prefixed byte strings and
//! sign-and-magnitude big integers.

use crate::CodecError;
use alloy_primitives::U256;

/// Appends a fixed-width big-endian u64.
pub fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Appends a length-prefixed byte string.
pub fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<(), CodecError> {
    put_seq_len(buf, bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Appends a sequence length prefix.
pub fn put_seq_len(buf: &mut Vec<u8>, len: usize) -> Result<(), CodecError> {
    let len: u32 = len.try_into().map_err(|_| CodecError::Overflow)?;
    buf.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

/// Appends a sign-and-magnitude big integer: a sign byte followed by the length-prefixed
/// minimal big-endian magnitude. Zero is canonical as non-negative with an empty magnitude.
pub fn put_bigint(buf: &mut Vec<u8>, negative: bool, magnitude: U256) -> Result<(), CodecError> {
    if magnitude.is_zero() {
        buf.push(0);
        return put_bytes(buf, &[]);
    }
    buf.push(negative as u8);
    put_bytes(buf, &magnitude.to_be_bytes_trimmed_vec())
}

/// Appends a u64 as a non-negative big integer.
pub fn put_uint(buf: &mut Vec<u8>, value: u64) -> Result<(), CodecError> {
    put_bigint(buf, false, U256::from(value))
}

/// Appends an i64 as a signed big integer.
pub fn put_int(buf: &mut Vec<u8>, value: i64) -> Result<(), CodecError> {
    put_bigint(buf, value < 0, U256::from(value.unsigned_abs()))
}
