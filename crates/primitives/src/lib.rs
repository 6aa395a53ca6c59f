//! Primitive types for the rollup compression engine.

pub use batch::{Batch, BatchHeader, GENESIS_SEQ_NO};
mod batch;

pub use block::L1Block;
mod block;

pub use rollup::{ExtRollup, Rollup, RollupHeader};
mod rollup;

pub use transaction::{transactions_root, Receipt, Transaction};
mod transaction;

mod macros;
