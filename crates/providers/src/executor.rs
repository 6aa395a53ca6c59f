use alloy_primitives::{Address, B256, U256};
use std::fmt::{self, Debug, Formatter};
use veil_primitives::{Batch, Receipt, Transaction};

/// An error that occurred at the batch executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The state transition failed.
    #[error("state transition failed: {0}")]
    StateTransition(String),
    /// Committing the state database failed.
    #[error("state commit failed: {0}")]
    Commit(String),
    /// The computed batch was committed more than once.
    #[error("batch already committed")]
    AlreadyCommitted,
}

/// The context for executing a single batch.
#[derive(Debug, Clone)]
pub struct BatchExecutionContext {
    /// The hash of the L1 block the batch commits to.
    pub l1_proof: B256,
    /// The hash of the parent batch header.
    pub parent_hash: B256,
    /// The ordered transactions of the batch.
    pub transactions: Vec<Transaction>,
    /// The batch timestamp, in unix seconds.
    pub time: u64,
    /// The sequence number of the batch.
    pub seq_no: u64,
    /// The coinbase of the batch.
    pub coinbase: Address,
    /// The base fee of the batch.
    pub base_fee: U256,
    /// The gas limit of the batch.
    pub gas_limit: u64,
}

type CommitFn = Box<dyn FnOnce(bool) -> Result<B256, ExecutorError> + Send>;

/// The result of executing a batch: the recreated batch and its receipts, plus a one-shot
/// commit of the underlying state database.
pub struct ComputedBatch {
    /// The computed batch.
    pub batch: Batch,
    /// The receipts of the executed transactions.
    pub receipts: Vec<Receipt>,
    commit: Option<CommitFn>,
}

impl Debug for ComputedBatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedBatch")
            .field("batch", &self.batch)
            .field("receipts", &self.receipts)
            .finish_non_exhaustive()
    }
}

impl ComputedBatch {
    /// Returns a new instance of a [`ComputedBatch`].
    pub fn new(
        batch: Batch,
        receipts: Vec<Receipt>,
        commit: impl FnOnce(bool) -> Result<B256, ExecutorError> + Send + 'static,
    ) -> Self {
        Self { batch, receipts, commit: Some(Box::new(commit)) }
    }

    /// Commits the state produced by the execution, returning the state root. When `persist`
    /// is false the state is computed but not written through.
    pub fn commit(&mut self, persist: bool) -> Result<B256, ExecutorError> {
        let commit = self.commit.take().ok_or(ExecutorError::AlreadyCommitted)?;
        commit(persist)
    }
}

/// The batch executor: a pure function from an execution context to a batch, used by the
/// engine to recover the header hashes the compression dropped.
pub trait BatchExecutor: Send + Sync {
    /// Creates the genesis batch anchored at the given L1 proof.
    fn create_genesis(
        &self,
        l1_proof: B256,
        time: u64,
        coinbase: Address,
        base_fee: U256,
    ) -> Result<Batch, ExecutorError>;

    /// Executes the transactions in the context against the parent state, producing the batch
    /// with its final header.
    fn compute_batch(&self, ctx: BatchExecutionContext) -> Result<ComputedBatch, ExecutorError>;
}
