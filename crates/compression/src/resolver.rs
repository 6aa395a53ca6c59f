use crate::RollupCompressionError;

use alloy_primitives::B256;
use std::collections::HashMap;
use veil_primitives::L1Block;
use veil_providers::Store;

/// Walks parent pointers from the given L1 head down to `min_height`, accumulating a map of
/// height to block. The walk is iterative so a long gap between the head and the oldest
/// referenced ancestor cannot exhaust the stack.
///
/// Fails with [`RollupCompressionError::MissingL1Block`] when a parent lookup misses. A head
/// below `min_height` terminates immediately; the caller surfaces the unreachable heights as
/// a gap when it looks them up.
pub(crate) fn resolve_l1_ancestors<S: Store>(
    store: &S,
    head: B256,
    min_height: u64,
) -> Result<HashMap<u64, L1Block>, RollupCompressionError> {
    let mut ancestors = HashMap::new();
    let mut cursor = head;
    loop {
        let block =
            store.fetch_block(&cursor)?.ok_or(RollupCompressionError::MissingL1Block(cursor))?;
        let number = block.number;
        cursor = block.parent_hash;
        ancestors.insert(number, block);
        if number <= min_height {
            return Ok(ancestors);
        }
    }
}
