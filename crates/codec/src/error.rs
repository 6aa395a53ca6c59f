/// An error occurring during encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The input buffer ended before the value was fully read.
    #[error("unexpected end of input")]
    Eof,
    /// Bytes were left over after a top-level decode.
    #[error("trailing bytes after decoding")]
    TrailingBytes,
    /// An integer was not in its canonical sign-and-magnitude form.
    #[error("non-canonical integer encoding")]
    NonCanonicalInteger,
    /// A negative integer was read where only non-negative values are valid.
    #[error("unexpected negative integer")]
    UnexpectedNegative,
    /// An integer does not fit the target width.
    #[error("integer out of range")]
    Overflow,
    /// A decoded batch time delta was negative.
    #[error("negative time delta")]
    NegativeTimeDelta,
    /// The cumulative L1 height went below zero.
    #[error("negative l1 height at batch index {0}")]
    NegativeL1Height(usize),
    /// The reorg vector was present but empty. Absent is the canonical form for no reorgs.
    #[error("reorg vector present but empty")]
    EmptyReorgs,
    /// The reorg presence marker was neither absent nor present.
    #[error("invalid reorg marker {0}")]
    InvalidReorgMarker(u8),
    /// A carried reorg batch header failed to decode.
    #[error("invalid reorg batch header")]
    InvalidReorgHeader,
    /// Two per-batch vectors disagree in length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// The expected length.
        expected: usize,
        /// The actual length.
        got: usize,
    },
    /// An operation over the batches of a rollup received none.
    #[error("empty batch sequence")]
    EmptyInput,
}
