use crate::{Batch, L1Block};

use alloy_primitives::{Address, Bytes, B256};
use std::collections::HashMap;

/// The outer rollup header, published in plaintext alongside the sealed blobs.
///
/// The signature covers the whole rollup and is produced by the sequencer; the compression
/// engine carries the header through unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollupHeader {
    /// The hash of the L1 head block the rollup was compressed against. Ancestor traversal
    /// during reconstruction starts here.
    pub compression_l1_head: B256,
    /// The number of the compression L1 head block.
    pub compression_l1_number: u64,
    /// The address of the sequencer that signed the rollup.
    pub signer: Address,
    /// The sequencer signature over the rollup.
    pub signature: Bytes,
}

/// The wire representation of a rollup: the plaintext outer header plus the two sealed blobs.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtRollup {
    /// The outer rollup header.
    pub header: RollupHeader,
    /// The sealed calldata rollup header.
    pub calldata_rollup_header: Bytes,
    /// The sealed per-batch transaction payloads.
    pub batch_payloads: Bytes,
}

/// A rollup as assembled in memory by the sequencer: an ordered, contiguous-by-seq list of
/// batches plus the L1 blocks their proofs point to.
#[derive(Debug, Default, Clone)]
pub struct Rollup {
    /// The outer rollup header.
    pub header: RollupHeader,
    /// The batches of the rollup, ordered by sequence number.
    pub batches: Vec<Batch>,
    /// The L1 blocks referenced by the batches, keyed by their hash.
    pub blocks: HashMap<B256, L1Block>,
}

impl Rollup {
    /// Returns a new instance of a [`Rollup`].
    pub fn new(header: RollupHeader, batches: Vec<Batch>, blocks: HashMap<B256, L1Block>) -> Self {
        Self { header, batches, blocks }
    }

    /// Returns the L1 block a batch proof points to, if known to the rollup.
    pub fn block_for(&self, l1_proof: &B256) -> Option<&L1Block> {
        self.blocks.get(l1_proof)
    }
}
