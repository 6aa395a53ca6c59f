//! The collaborator interfaces consumed by the rollup compression engine: the store over L1
//! blocks and L2 batches, the batch executor and the batch registry. The engine holds these
//! as explicit dependencies injected at construction.

pub use store::{Store, StoreError};
mod store;

pub use executor::{BatchExecutionContext, BatchExecutor, ComputedBatch, ExecutorError};
mod executor;

pub use registry::BatchRegistry;
mod registry;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers.
pub mod test_utils;
