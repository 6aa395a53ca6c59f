//! The process side of the engine: from a sealed wire record back to stored, executed
//! batches. The logical pair of [`crate::build`].
//!
//! Recreation is a two step affair: first the implicit and explicit metadata is expanded
//! into per-batch facts, then each batch is executed in rollup order so its header hash can
//! seed the parent hash of the next one.

use crate::{resolver::resolve_l1_ancestors, RollupCompression, RollupCompressionError};

use alloy_primitives::B256;
use std::sync::atomic::Ordering;
use veil_codec::{decode_batch_payloads, delta, CalldataRollupHeader, CodecError};
use veil_primitives::{Batch, BatchHeader, ExtRollup, Transaction, GENESIS_SEQ_NO};
use veil_providers::{
    BatchExecutionContext, BatchExecutor, BatchRegistry, Store,
};

/// The facts recovered for one batch before it is executed.
#[derive(Debug)]
struct RecreatedBatch {
    seq_no: u64,
    height: u64,
    time: u64,
    l1_proof: B256,
    transactions: Vec<Transaction>,
    reorg_header: Option<BatchHeader>,
}

/// How a recreated batch becomes a stored one.
#[derive(Debug)]
enum BatchCase {
    /// The batch was reorged away; its carried header is stored verbatim.
    Reorg(BatchHeader),
    /// The genesis batch, created rather than computed.
    Genesis,
    /// A regular batch, recovered by executing its transactions against the parent state.
    Default,
}

impl<S, E, R> RollupCompression<S, E, R>
where
    S: Store,
    E: BatchExecutor,
    R: BatchRegistry,
{
    /// Opens, checks and stores every batch found inside the given [`ExtRollup`], returning
    /// the decoded calldata header.
    ///
    /// Batches stored before a failure remain stored, they are independently valid. The
    /// whole call fails with [`RollupCompressionError::Cancelled`] when the interrupt flag
    /// is raised at a batch boundary.
    pub fn process_ext_rollup(
        &self,
        rollup: &ExtRollup,
    ) -> Result<CalldataRollupHeader, RollupCompressionError> {
        let header_bytes = self.envelope.open(&rollup.calldata_rollup_header)?;
        let calldata_header = CalldataRollupHeader::decode(&header_bytes)?;

        let payload_bytes = self.envelope.open(&rollup.batch_payloads)?;
        let transactions_per_batch = decode_batch_payloads(&payload_bytes)?;

        let batches = self.recreate_batches(
            &calldata_header,
            transactions_per_batch,
            rollup.header.compression_l1_head,
        )?;
        self.execute_and_store(&calldata_header, batches)?;

        self.metrics.rollups_processed.increment(1);
        Ok(calldata_header)
    }

    /// Expands the calldata header into per-batch facts: sequence number, height, time and
    /// L1 proof, from the deltas and the resolved L1 ancestors.
    fn recreate_batches(
        &self,
        header: &CalldataRollupHeader,
        transactions_per_batch: Vec<Vec<Transaction>>,
        compression_l1_head: B256,
    ) -> Result<Vec<RecreatedBatch>, RollupCompressionError> {
        let count = transactions_per_batch.len();
        if count == 0 {
            return Err(RollupCompressionError::EmptyRollup);
        }
        check_length(header.batch_count(), count)?;
        check_length(header.l1_height_deltas.len(), count)?;
        if let Some(reorgs) = &header.reorgs {
            check_length(reorgs.len(), count)?;
        }

        let times = delta::recover_times(header.start_time, &header.batch_time_deltas)?;
        let l1_heights = delta::recover_l1_heights(&header.l1_height_deltas)?;
        let min_height =
            l1_heights.iter().min().copied().ok_or(RollupCompressionError::EmptyRollup)?;

        let ancestors =
            resolve_l1_ancestors(self.store.as_ref(), compression_l1_head, min_height)?;

        let mut canonical_count = 0u64;
        let mut batches = Vec::with_capacity(count);
        for (idx, transactions) in transactions_per_batch.into_iter().enumerate() {
            let l1_height = l1_heights[idx];
            let block = ancestors
                .get(&l1_height)
                .ok_or(RollupCompressionError::L1Gap { height: l1_height, min: min_height })?;

            // only canonical batches advance the height; a reorged batch carries its own.
            let reorg_header = header.reorgs.as_ref().and_then(|entries| entries[idx].clone());
            let height = match &reorg_header {
                Some(carried) => carried.height,
                None => {
                    let height = header.first_canon_height + canonical_count;
                    canonical_count += 1;
                    height
                }
            };

            let recreated = RecreatedBatch {
                seq_no: header.first_batch_seq_no + idx as u64,
                height,
                time: times[idx],
                l1_proof: block.hash,
                transactions,
                reorg_header,
            };
            tracing::debug!(
                target: "veil::compression",
                seq_no = recreated.seq_no,
                height = recreated.height,
                rollup_idx = idx,
                l1_height,
                l1_hash = ?block.hash,
                "recreated batch from rollup"
            );
            batches.push(recreated);
        }
        Ok(batches)
    }

    /// Executes and stores the recreated batches in rollup order, threading the parent hash
    /// through canonical batches only.
    fn execute_and_store(
        &self,
        header: &CalldataRollupHeader,
        batches: Vec<RecreatedBatch>,
    ) -> Result<(), RollupCompressionError> {
        let mut parent_hash = header.first_canon_parent_hash;

        // unless the rollup starts at genesis it chains onto a batch that must already be
        // known.
        if header.first_batch_seq_no != GENESIS_SEQ_NO {
            self.store
                .fetch_batch(&parent_hash)?
                .ok_or(RollupCompressionError::UnknownParentBatch(parent_hash))?;
        }

        for recreated in batches {
            if self.interrupt.load(Ordering::Relaxed) {
                return Err(RollupCompressionError::Cancelled);
            }

            // a batch already in the store was delivered by an earlier rollup or produced
            // locally; chain onto it and move on.
            if let Some(stored) = self.store.fetch_batch_by_seq(recreated.seq_no)? {
                if recreated.reorg_header.is_none() {
                    parent_hash = stored.hash();
                }
                self.metrics.batches_skipped.increment(1);
                continue;
            }

            let RecreatedBatch { seq_no, height, time, l1_proof, transactions, reorg_header } =
                recreated;
            let case = match reorg_header {
                Some(carried) => BatchCase::Reorg(carried),
                None if seq_no == GENESIS_SEQ_NO => BatchCase::Genesis,
                None => BatchCase::Default,
            };

            match case {
                BatchCase::Reorg(carried) => {
                    tracing::debug!(
                        target: "veil::compression",
                        seq_no,
                        hash = ?carried.hash_slow(),
                        "storing reorged batch verbatim"
                    );
                    self.store.store_batch(&Batch::new(carried, transactions))?;
                    // parent_hash is untouched: a reorged batch is off the canonical chain.
                }
                BatchCase::Genesis => {
                    let genesis = self
                        .executor
                        .create_genesis(l1_proof, time, header.coinbase, header.base_fee)
                        .map_err(|err| RollupCompressionError::execution(seq_no, err))?;
                    self.store.store_batch(&genesis)?;
                    self.store.store_executed_batch(&genesis, &[])?;
                    self.registry.on_batch_executed(&genesis, None);
                    parent_hash = genesis.hash();
                    tracing::debug!(
                        target: "veil::compression",
                        hash = ?parent_hash,
                        "stored genesis batch"
                    );
                }
                BatchCase::Default => {
                    let ctx = BatchExecutionContext {
                        l1_proof,
                        parent_hash,
                        transactions,
                        time,
                        seq_no,
                        coinbase: header.coinbase,
                        base_fee: header.base_fee,
                        gas_limit: header.gas_limit,
                    };
                    let mut computed = self
                        .executor
                        .compute_batch(ctx)
                        .map_err(|err| RollupCompressionError::execution(seq_no, err))?;
                    if computed.batch.header.height != height {
                        return Err(RollupCompressionError::execution(
                            seq_no,
                            format!(
                                "executed height {} does not match derived height {height}",
                                computed.batch.header.height
                            ),
                        ));
                    }
                    computed
                        .commit(true)
                        .map_err(|err| RollupCompressionError::execution(seq_no, err))?;
                    self.store.store_batch(&computed.batch)?;
                    self.store.store_executed_batch(&computed.batch, &computed.receipts)?;
                    self.registry.on_batch_executed(&computed.batch, Some(&computed.receipts));
                    parent_hash = computed.batch.hash();
                }
            }
            self.metrics.batches_stored.increment(1);
        }
        Ok(())
    }
}

fn check_length(got: usize, expected: usize) -> Result<(), RollupCompressionError> {
    if got != expected {
        return Err(CodecError::LengthMismatch { expected, got }.into());
    }
    Ok(())
}
