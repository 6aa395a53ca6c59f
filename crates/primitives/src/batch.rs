use crate::{from_be_bytes_slice_and_advance_buf, from_slice_and_advance_buf, Transaction};

use alloy_primitives::{
    bytes::{Buf, BufMut},
    keccak256, Address, B256, U256,
};

/// The sequence number of the genesis batch.
pub const GENESIS_SEQ_NO: u64 = 0;

/// The header of an L2 batch.
///
/// The canonical encoding is fixed width and the batch hash is the keccak of it, so two
/// headers with equal fields hash identically on every node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    /// The hash of the parent batch header.
    pub parent_hash: B256,
    /// The sequence number of the batch. Monotone and gapless across the L2 history.
    pub seq_no: u64,
    /// The height of the batch. Monotone across canonical batches only.
    pub height: u64,
    /// The batch timestamp, in unix seconds.
    pub time: u64,
    /// The hash of the L1 block this batch commits to.
    pub l1_proof: B256,
    /// The merkle root over the batch transactions.
    pub tx_root: B256,
    /// The state root after executing the batch.
    pub state_root: B256,
    /// The coinbase of the batch.
    pub coinbase: Address,
    /// The base fee of the batch.
    pub base_fee: U256,
    /// The gas limit of the batch.
    pub gas_limit: u64,
}

impl BatchHeader {
    /// The length of the canonical header encoding.
    pub const BYTES_LENGTH: usize = 212;

    /// Encodes the header into its canonical fixed-width representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::<u8>::with_capacity(Self::BYTES_LENGTH);
        bytes.put_slice(&self.parent_hash.0);
        bytes.put_slice(&self.seq_no.to_be_bytes());
        bytes.put_slice(&self.height.to_be_bytes());
        bytes.put_slice(&self.time.to_be_bytes());
        bytes.put_slice(&self.l1_proof.0);
        bytes.put_slice(&self.tx_root.0);
        bytes.put_slice(&self.state_root.0);
        bytes.put_slice(self.coinbase.as_slice());
        bytes.put_slice(&self.base_fee.to_be_bytes::<32>());
        bytes.put_slice(&self.gas_limit.to_be_bytes());
        bytes
    }

    /// Tries to read from the input buffer into the [`BatchHeader`], advancing the buffer.
    /// Returns [`None`] if the buffer holds less than [`BatchHeader::BYTES_LENGTH`] bytes.
    pub fn try_from_buf(buf: &mut &[u8]) -> Option<Self> {
        if buf.len() < Self::BYTES_LENGTH {
            return None;
        }

        let parent_hash = from_slice_and_advance_buf!(B256, buf);
        let seq_no = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let height = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let time = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let l1_proof = from_slice_and_advance_buf!(B256, buf);
        let tx_root = from_slice_and_advance_buf!(B256, buf);
        let state_root = from_slice_and_advance_buf!(B256, buf);
        let coinbase = from_slice_and_advance_buf!(Address, buf);
        let base_fee = U256::from_be_slice(&buf[..32]);
        buf.advance(32);
        let gas_limit = from_be_bytes_slice_and_advance_buf!(u64, buf);

        Some(Self {
            parent_hash,
            seq_no,
            height,
            time,
            l1_proof,
            tx_root,
            state_root,
            coinbase,
            base_fee,
            gas_limit,
        })
    }

    /// Computes the hash of the header.
    pub fn hash_slow(&self) -> B256 {
        keccak256(self.encode())
    }
}

/// An L2 batch: a header plus the ordered transactions it contains.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Batch {
    /// The header of the batch.
    pub header: BatchHeader,
    /// The ordered transactions of the batch.
    pub transactions: Vec<Transaction>,
}

impl Batch {
    /// Returns a new instance of a [`Batch`].
    pub const fn new(header: BatchHeader, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions }
    }

    /// The hash of the batch header.
    pub fn hash(&self) -> B256 {
        self.header.hash_slow()
    }

    /// The sequence number of the batch.
    pub const fn seq_no(&self) -> u64 {
        self.header.seq_no
    }
}
