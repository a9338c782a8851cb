//! Anomaly scoring for OCR-extracted documents
//!
//! The engine runs a fixed sequence of independent heuristics over the text
//! blocks of one document and renders the verdict as a [`VerificationReport`].
//! It holds no state and performs no I/O.

pub mod patterns;
pub mod report;
pub mod rules;

use shared_types::{AnalysisResult, TextBlock, VerificationReport};
use tracing::debug;

pub use report::{build_error_report, build_report, MAX_EXTRACTED_TEXT_CHARS};

/// VerificationEngine entry point
pub struct VerificationEngine;

impl VerificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score one document's text blocks.
    ///
    /// Checks are cumulative; any number of issues may be reported. The issue
    /// list is never empty: a clean document carries the authentic sentinel.
    pub fn analyze(&self, blocks: &[TextBlock]) -> AnalysisResult {
        if blocks.is_empty() {
            return AnalysisResult {
                is_valid: false,
                confidence_percent: 0.0,
                total_blocks: 0,
                low_confidence_blocks: 0,
                issues: vec![patterns::NO_TEXT_ISSUE.to_string()],
                joined_text: String::new(),
            };
        }

        let avg = rules::confidence::average_confidence(blocks);
        let low_count = rules::confidence::count_low_confidence(blocks);

        let text_lower = blocks
            .iter()
            .map(|b| b.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        let mut issues = Vec::new();
        issues.extend(rules::confidence::check_low_confidence(low_count, blocks.len()));
        issues.extend(rules::keywords::check_suspicious_keywords(&text_lower));
        issues.extend(rules::alignment::check_alignment(blocks));

        let is_valid = avg > patterns::VALID_CONFIDENCE_FLOOR && issues.is_empty();
        debug!(
            blocks = blocks.len(),
            avg_confidence = avg,
            issues = issues.len(),
            is_valid,
            "Document analyzed"
        );

        if issues.is_empty() {
            issues.push(patterns::AUTHENTIC_SENTINEL.to_string());
        }

        AnalysisResult {
            is_valid,
            confidence_percent: rules::confidence::to_percent(avg),
            total_blocks: blocks.len(),
            low_confidence_blocks: low_count,
            issues,
            joined_text: blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Analyze and render in one step
    pub fn verify_blocks(&self, blocks: Vec<TextBlock>) -> VerificationReport {
        let analysis = self.analyze(&blocks);
        build_report(analysis, blocks)
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new()
    }
}
