use alloy_primitives::B256;
use veil_primitives::{Batch, L1Block, Receipt};

/// An error that occurred at the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend failed to serve the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The store over L1 blocks and L2 batches.
///
/// Lookups return `Ok(None)` for values the store does not hold; `Err` is reserved for
/// backend failures. The engine assumes exclusive write access for the duration of one
/// rollup being processed.
pub trait Store: Send + Sync {
    /// Returns the L1 block with the given hash.
    fn fetch_block(&self, hash: &B256) -> Result<Option<L1Block>, StoreError>;

    /// Returns the batch with the given header hash.
    fn fetch_batch(&self, hash: &B256) -> Result<Option<Batch>, StoreError>;

    /// Returns the batch with the given sequence number.
    fn fetch_batch_by_seq(&self, seq_no: u64) -> Result<Option<Batch>, StoreError>;

    /// Returns all non-canonical batches with a sequence number in `lo..=hi`.
    fn fetch_non_canonical_batches_between(
        &self,
        lo: u64,
        hi: u64,
    ) -> Result<Vec<Batch>, StoreError>;

    /// Persists a batch.
    fn store_batch(&self, batch: &Batch) -> Result<(), StoreError>;

    /// Persists the execution results of a batch.
    fn store_executed_batch(&self, batch: &Batch, receipts: &[Receipt]) -> Result<(), StoreError>;
}
