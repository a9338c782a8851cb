use std::collections::HashSet;

use crate::patterns::{ALIGNMENT_ISSUE, MIN_DISTINCT_BASELINE_RATIO};
use shared_types::TextBlock;

/// Flags documents where most blocks share the same top edge.
///
/// Genuine certificates spread text over many lines; an overlay or a re-typed
/// line tends to produce many blocks on a handful of identical baselines.
pub fn check_alignment(blocks: &[TextBlock]) -> Option<String> {
    let distinct: HashSet<i32> = blocks.iter().map(TextBlock::top).collect();
    if (distinct.len() as f64) < blocks.len() as f64 * MIN_DISTINCT_BASELINE_RATIO {
        Some(ALIGNMENT_ISSUE.to_string())
    } else {
        None
    }
}
