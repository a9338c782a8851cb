//! Keyword watchlists and scoring thresholds for tamper detection

/// Words that hint at a digitally altered or non-original document.
/// Matched as lower-case substrings, so "sampled" also hits "sample".
pub const SUSPICIOUS_KEYWORDS: &[&str] = &["photoshop", "edited", "sample", "watermark"];

/// Blocks below this OCR confidence count as low-confidence
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Share of low-confidence blocks above which the scan is flagged
pub const LOW_CONFIDENCE_MAX_RATIO: f64 = 0.3;

/// Minimum share of distinct block baselines before alignment is flagged
pub const MIN_DISTINCT_BASELINE_RATIO: f64 = 0.3;

/// Average confidence a document must exceed to be considered valid
pub const VALID_CONFIDENCE_FLOOR: f64 = 0.75;

pub const NO_TEXT_ISSUE: &str = "No text detected in document";
pub const AUTHENTIC_SENTINEL: &str = "Document appears authentic";
pub const ALIGNMENT_ISSUE: &str = "Unusual text alignment detected";

/// Return the watchlist entries present in `text_lower`, in watchlist order
pub fn find_keywords<'a>(text_lower: &str, keywords: &[&'a str]) -> Vec<&'a str> {
    keywords
        .iter()
        .copied()
        .filter(|keyword| text_lower.contains(keyword))
        .collect()
}
