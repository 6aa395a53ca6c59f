//! The rollup compression engine.
//!
//! After the transaction payloads, the main overhead in a published rollup are the batch
//! headers, and the engine exists to strip them while keeping reconstruction exact:
//!
//! - a second sealed metadata blob, the [`CalldataRollupHeader`](veil_codec::CalldataRollupHeader),
//!   carries the bare minimum needed to recreate the batches: implicit positions, deltas and
//!   exceptions;
//! - hashes do not compress, so parent hashes are not stored at all. Each batch is
//!   re-executed on the receiving side and the parent hash of the next batch is taken from
//!   the executed header, which also keeps the reconstructed chain cryptographically
//!   linked: a batch that does not execute to the original header breaks the parent chain
//!   of everything after it;
//! - batch signatures are dropped, since the rollup itself is signed;
//! - batches that were reorged away cannot be re-derived from L1 state and are the one
//!   exception, carried with their full header.
//!
//! The engine is synchronous and single-threaded by design: the parent hash must be
//! threaded through the batches strictly in order.

pub use error::RollupCompressionError;
mod error;

pub use metrics::RollupCompressionMetrics;
mod metrics;

mod build;
mod process;
mod resolver;

use std::{
    fmt::{self, Debug, Formatter},
    sync::{atomic::AtomicBool, Arc},
};

use veil_envelope::SecureEnvelope;
use veil_providers::{BatchExecutor, BatchRegistry, Store};

/// The rollup compression engine.
///
/// Holds its collaborators as explicit dependencies injected at construction and owns none
/// of the underlying storage. One instance serves both directions: building sealed rollups
/// on the sequencer and processing them on every receiving node.
pub struct RollupCompression<S, E, R> {
    store: Arc<S>,
    executor: Arc<E>,
    registry: Arc<R>,
    envelope: SecureEnvelope,
    interrupt: Arc<AtomicBool>,
    metrics: RollupCompressionMetrics,
}

impl<S, E, R> Debug for RollupCompression<S, E, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollupCompression")
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

impl<S, E, R> RollupCompression<S, E, R>
where
    S: Store,
    E: BatchExecutor,
    R: BatchRegistry,
{
    /// Returns a new instance of the [`RollupCompression`] engine.
    ///
    /// The interrupt flag is checked at batch boundaries while processing; raising it makes
    /// the engine return [`RollupCompressionError::Cancelled`] without corrupting state.
    pub fn new(
        store: Arc<S>,
        executor: Arc<E>,
        registry: Arc<R>,
        envelope: SecureEnvelope,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            executor,
            registry,
            envelope,
            interrupt,
            metrics: RollupCompressionMetrics::default(),
        }
    }
}
