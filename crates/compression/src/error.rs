use alloy_primitives::B256;
use veil_codec::CodecError;
use veil_envelope::EnvelopeError;
use veil_providers::StoreError;

/// An error occurring while building or processing a rollup. Any of them aborts the current
/// call; batches stored before the failure remain, they are independently valid.
#[derive(Debug, thiserror::Error)]
pub enum RollupCompressionError {
    /// The wire metadata or payloads were malformed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Sealing or opening a blob failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The ancestor resolver could not fetch an L1 block.
    #[error("missing l1 block {0}")]
    MissingL1Block(B256),
    /// A batch references an L1 height outside the resolvable ancestor range.
    #[error("l1 height {height} outside the resolvable ancestor range (minimum {min})")]
    L1Gap {
        /// The height the batch references.
        height: u64,
        /// The minimum height of the resolved ancestor map.
        min: u64,
    },
    /// The batch the rollup chains onto is not in the store.
    #[error("unknown parent batch {0}")]
    UnknownParentBatch(B256),
    /// The executor failed, or the executed batch disagrees with the derived facts.
    #[error("execution mismatch for batch {seq_no}: {reason}")]
    ExecutionMismatch {
        /// The sequence number of the failing batch.
        seq_no: u64,
        /// What went wrong.
        reason: String,
    },
    /// The rollup holds no batches.
    #[error("empty rollup")]
    EmptyRollup,
    /// A batch disagrees with the rollup-wide coinbase, base fee or gas limit.
    #[error("batch {seq_no} does not share the rollup coinbase, base fee and gas limit")]
    InconsistentRollupFields {
        /// The sequence number of the offending batch.
        seq_no: u64,
    },
    /// Cooperative shutdown was observed at a batch boundary.
    #[error("processing cancelled")]
    Cancelled,
}

impl RollupCompressionError {
    /// Returns an [`RollupCompressionError::ExecutionMismatch`] for the given batch.
    pub(crate) fn execution(seq_no: u64, reason: impl ToString) -> Self {
        Self::ExecutionMismatch { seq_no, reason: reason.to_string() }
    }
}
