//! In-memory implementations of the collaborator interfaces, for tests.

use crate::{
    BatchExecutionContext, BatchExecutor, BatchRegistry, ComputedBatch, ExecutorError, Store,
    StoreError,
};

use alloy_primitives::{keccak256, Address, B256, U256};
use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, RwLock},
};
use veil_primitives::{
    transactions_root, Batch, BatchHeader, L1Block, Receipt, GENESIS_SEQ_NO,
};

/// An in-memory [`Store`] over hash maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    blocks: HashMap<B256, L1Block>,
    batches: HashMap<B256, Batch>,
    seq_index: HashMap<u64, B256>,
    receipts: HashMap<B256, Vec<Receipt>>,
    non_canonical: BTreeSet<u64>,
}

impl InMemoryStore {
    /// Adds an L1 block to the store.
    pub fn add_block(&self, block: L1Block) {
        self.inner.write().unwrap().blocks.insert(block.hash, block);
    }

    /// Marks the batch with the given sequence number as non-canonical.
    pub fn mark_non_canonical(&self, seq_no: u64) {
        self.inner.write().unwrap().non_canonical.insert(seq_no);
    }

    /// The number of batches held by the store.
    pub fn batch_count(&self) -> usize {
        self.inner.read().unwrap().batches.len()
    }

    /// Whether the store holds a batch with the given header hash.
    pub fn contains_batch(&self, hash: &B256) -> bool {
        self.inner.read().unwrap().batches.contains_key(hash)
    }

    /// The receipts stored for the batch with the given header hash.
    pub fn receipts_for(&self, hash: &B256) -> Option<Vec<Receipt>> {
        self.inner.read().unwrap().receipts.get(hash).cloned()
    }
}

impl Store for InMemoryStore {
    fn fetch_block(&self, hash: &B256) -> Result<Option<L1Block>, StoreError> {
        Ok(self.inner.read().unwrap().blocks.get(hash).copied())
    }

    fn fetch_batch(&self, hash: &B256) -> Result<Option<Batch>, StoreError> {
        Ok(self.inner.read().unwrap().batches.get(hash).cloned())
    }

    fn fetch_batch_by_seq(&self, seq_no: u64) -> Result<Option<Batch>, StoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.seq_index.get(&seq_no).and_then(|hash| inner.batches.get(hash)).cloned())
    }

    fn fetch_non_canonical_batches_between(
        &self,
        lo: u64,
        hi: u64,
    ) -> Result<Vec<Batch>, StoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .non_canonical
            .range(lo..=hi)
            .filter_map(|seq_no| inner.seq_index.get(seq_no))
            .filter_map(|hash| inner.batches.get(hash))
            .cloned()
            .collect())
    }

    fn store_batch(&self, batch: &Batch) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let hash = batch.hash();
        inner.seq_index.insert(batch.seq_no(), hash);
        inner.batches.insert(hash, batch.clone());
        Ok(())
    }

    fn store_executed_batch(&self, batch: &Batch, receipts: &[Receipt]) -> Result<(), StoreError> {
        self.inner.write().unwrap().receipts.insert(batch.hash(), receipts.to_vec());
        Ok(())
    }
}

/// A deterministic [`BatchExecutor`] over the in-memory store.
///
/// The state root is a hash over the execution inputs, so two nodes executing the same batch
/// against the same parent always produce byte-identical headers.
#[derive(Debug)]
pub struct TestBatchExecutor {
    store: Arc<InMemoryStore>,
    gas_limit: u64,
    fail_on_seq: Option<u64>,
}

impl TestBatchExecutor {
    /// Returns a new executor over the given store.
    pub fn new(store: Arc<InMemoryStore>, gas_limit: u64) -> Self {
        Self { store, gas_limit, fail_on_seq: None }
    }

    /// Returns a new executor that fails the state transition of the given sequence number.
    pub fn with_failure_on(store: Arc<InMemoryStore>, gas_limit: u64, seq_no: u64) -> Self {
        Self { store, gas_limit, fail_on_seq: Some(seq_no) }
    }

    fn state_root(parent_hash: &B256, tx_root: &B256, seq_no: u64, time: u64) -> B256 {
        let mut preimage = Vec::with_capacity(80);
        preimage.extend_from_slice(&parent_hash.0);
        preimage.extend_from_slice(&tx_root.0);
        preimage.extend_from_slice(&seq_no.to_be_bytes());
        preimage.extend_from_slice(&time.to_be_bytes());
        keccak256(preimage)
    }
}

impl BatchExecutor for TestBatchExecutor {
    fn create_genesis(
        &self,
        l1_proof: B256,
        time: u64,
        coinbase: Address,
        base_fee: U256,
    ) -> Result<Batch, ExecutorError> {
        let tx_root = transactions_root(&[]);
        let header = BatchHeader {
            parent_hash: B256::ZERO,
            seq_no: GENESIS_SEQ_NO,
            height: 0,
            time,
            l1_proof,
            tx_root,
            state_root: Self::state_root(&B256::ZERO, &tx_root, GENESIS_SEQ_NO, time),
            coinbase,
            base_fee,
            gas_limit: self.gas_limit,
        };
        Ok(Batch::new(header, vec![]))
    }

    fn compute_batch(&self, ctx: BatchExecutionContext) -> Result<ComputedBatch, ExecutorError> {
        if self.fail_on_seq == Some(ctx.seq_no) {
            return Err(ExecutorError::StateTransition(format!(
                "injected failure at seq {}",
                ctx.seq_no
            )));
        }

        let parent = self
            .store
            .fetch_batch(&ctx.parent_hash)
            .map_err(|err| ExecutorError::StateTransition(err.to_string()))?
            .ok_or_else(|| {
                ExecutorError::StateTransition(format!("unknown parent batch {}", ctx.parent_hash))
            })?;

        let tx_root = transactions_root(&ctx.transactions);
        let state_root = Self::state_root(&ctx.parent_hash, &tx_root, ctx.seq_no, ctx.time);
        let header = BatchHeader {
            parent_hash: ctx.parent_hash,
            seq_no: ctx.seq_no,
            height: parent.header.height + 1,
            time: ctx.time,
            l1_proof: ctx.l1_proof,
            tx_root,
            state_root,
            coinbase: ctx.coinbase,
            base_fee: ctx.base_fee,
            gas_limit: ctx.gas_limit,
        };

        let receipts = ctx
            .transactions
            .iter()
            .map(|tx| Receipt::new(keccak256(tx.as_ref()).to_vec()))
            .collect();
        let batch = Batch::new(header, ctx.transactions);

        Ok(ComputedBatch::new(batch, receipts, move |_persist| Ok(state_root)))
    }
}

/// A [`BatchRegistry`] recording the hash of every executed batch it is notified of.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    executed: Mutex<Vec<B256>>,
}

impl RecordingRegistry {
    /// The hashes of the batches the registry was notified of, in notification order.
    pub fn executed(&self) -> Vec<B256> {
        self.executed.lock().unwrap().clone()
    }
}

impl BatchRegistry for RecordingRegistry {
    fn on_batch_executed(&self, batch: &Batch, _receipts: Option<&[Receipt]>) {
        self.executed.lock().unwrap().push(batch.hash());
    }
}
