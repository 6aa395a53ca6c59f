use metrics::Counter;
use metrics_derive::Metrics;

/// The metrics for the [`super::RollupCompression`] engine.
#[derive(Metrics, Clone)]
#[metrics(scope = "rollup_compression")]
pub struct RollupCompressionMetrics {
    /// A counter on the rollups built into sealed blobs.
    pub rollups_built: Counter,
    /// A counter on the rollups processed from sealed blobs.
    pub rollups_processed: Counter,
    /// A counter on the batches recreated and stored while processing.
    pub batches_stored: Counter,
    /// A counter on the batches skipped because the store already held them.
    pub batches_skipped: Counter,
}
