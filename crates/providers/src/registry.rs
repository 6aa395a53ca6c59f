use veil_primitives::{Batch, Receipt};

/// The registry notified of every batch the engine executes and persists.
pub trait BatchRegistry: Send + Sync {
    /// Called after a batch has been executed and stored. Genesis batches carry no receipts.
    fn on_batch_executed(&self, batch: &Batch, receipts: Option<&[Receipt]>);
}
