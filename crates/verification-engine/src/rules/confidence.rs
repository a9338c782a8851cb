// Scan fidelity checks based on per-block OCR confidence
use crate::patterns::{LOW_CONFIDENCE_MAX_RATIO, LOW_CONFIDENCE_THRESHOLD};
use shared_types::TextBlock;

/// Mean confidence over all blocks, 0.0 for an empty slice
pub fn average_confidence(blocks: &[TextBlock]) -> f64 {
    if blocks.is_empty() {
        return 0.0;
    }
    blocks.iter().map(|b| b.confidence).sum::<f64>() / blocks.len() as f64
}

pub fn count_low_confidence(blocks: &[TextBlock]) -> usize {
    blocks
        .iter()
        .filter(|b| b.confidence < LOW_CONFIDENCE_THRESHOLD)
        .count()
}

/// Flags a scan where too many regions were read with low confidence,
/// which usually means pasted-in or re-rendered text.
pub fn check_low_confidence(low_count: usize, total: usize) -> Option<String> {
    if low_count as f64 > total as f64 * LOW_CONFIDENCE_MAX_RATIO {
        Some(format!(
            "High number of low-confidence text blocks ({})",
            low_count
        ))
    } else {
        None
    }
}

/// Convert a 0..1 average into a percentage rounded to two decimals
pub fn to_percent(avg: f64) -> f64 {
    (avg * 100.0 * 100.0).round() / 100.0
}
