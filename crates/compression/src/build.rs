//! The build side of the engine: from a sequencer's in-memory rollup to the sealed wire
//! record. The logical pair of [`crate::process`].

use crate::{RollupCompression, RollupCompressionError};

use std::collections::HashSet;
use veil_codec::{encode_batch_payloads, CalldataRollupHeader};
use veil_primitives::{Batch, ExtRollup, Rollup};
use veil_providers::{BatchExecutor, BatchRegistry, Store};

impl<S, E, R> RollupCompression<S, E, R>
where
    S: Store,
    E: BatchExecutor,
    R: BatchRegistry,
{
    /// Builds the sealed [`ExtRollup`] for the given in-memory rollup.
    ///
    /// The calldata header and the per-batch transaction payloads are sealed independently;
    /// the outer rollup header is carried through unchanged, it is signed separately by the
    /// sequencer. No partial output is emitted on failure.
    pub fn create_ext_rollup(&self, rollup: &Rollup) -> Result<ExtRollup, RollupCompressionError> {
        let batches = &rollup.batches;
        let first = batches.first().ok_or(RollupCompressionError::EmptyRollup)?;
        let last = batches.last().ok_or(RollupCompressionError::EmptyRollup)?;

        // all batches in one rollup share the coinbase, base fee and gas limit; the calldata
        // header stores them once.
        for batch in batches {
            let header = &batch.header;
            if header.coinbase != first.header.coinbase
                || header.base_fee != first.header.base_fee
                || header.gas_limit != first.header.gas_limit
            {
                return Err(RollupCompressionError::InconsistentRollupFields {
                    seq_no: header.seq_no,
                });
            }
        }

        // the sequencer created the batches, so it holds every referenced block.
        let mut l1_heights = Vec::with_capacity(batches.len());
        for batch in batches {
            let block = rollup
                .block_for(&batch.header.l1_proof)
                .ok_or(RollupCompressionError::MissingL1Block(batch.header.l1_proof))?;
            l1_heights.push(block.number);
        }

        let reorged =
            self.store.fetch_non_canonical_batches_between(first.seq_no(), last.seq_no())?;
        let reorg_seqs = reorged.iter().map(Batch::seq_no).collect::<HashSet<_>>();

        for batch in batches {
            tracing::debug!(
                target: "veil::compression",
                seq_no = batch.seq_no(),
                height = batch.header.height,
                hash = ?batch.hash(),
                reorg = reorg_seqs.contains(&batch.seq_no()),
                "compressing batch into rollup"
            );
        }

        let calldata_header = CalldataRollupHeader::from_batches(batches, &l1_heights, &reorg_seqs)?;
        let sealed_header = self.envelope.seal(&calldata_header.encode()?)?;

        let payloads = batches.iter().map(|b| b.transactions.clone()).collect::<Vec<_>>();
        let sealed_payloads = self.envelope.seal(&encode_batch_payloads(&payloads)?)?;

        self.metrics.rollups_built.increment(1);

        Ok(ExtRollup {
            header: rollup.header.clone(),
            calldata_rollup_header: sealed_header.into(),
            batch_payloads: sealed_payloads.into(),
        })
    }
}
