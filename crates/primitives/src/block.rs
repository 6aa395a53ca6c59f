use alloy_primitives::B256;

/// Information about an L1 block, as needed for ancestor traversal and batch anchoring.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct L1Block {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
    /// The hash of the parent block.
    pub parent_hash: B256,
}

impl L1Block {
    /// Returns a new instance of [`L1Block`].
    pub const fn new(hash: B256, number: u64, parent_hash: B256) -> Self {
        Self { hash, number, parent_hash }
    }
}
