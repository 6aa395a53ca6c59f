use alloy_primitives::{Bytes, B256};
use alloy_trie::{root::ordered_trie_root_with_encoder, EMPTY_ROOT_HASH};

/// An opaque signed L2 transaction, carried as its canonical encoded bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::From)]
pub struct Transaction(pub Bytes);

impl Transaction {
    /// Returns a new instance of a [`Transaction`].
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }
}

impl AsRef<[u8]> for Transaction {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// An opaque execution receipt, carried as its canonical encoded bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::From)]
pub struct Receipt(pub Bytes);

impl Receipt {
    /// Returns a new instance of a [`Receipt`].
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }
}

/// Computes the merkle root over the ordered transactions of a batch.
/// An empty transaction list yields the empty trie root.
pub fn transactions_root(transactions: &[Transaction]) -> B256 {
    if transactions.is_empty() {
        return EMPTY_ROOT_HASH;
    }
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(tx.as_ref()))
}
