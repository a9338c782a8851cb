//! Turns analyzer output into the client-facing verification report

use shared_types::{AnalysisResult, ReportStatus, TextBlock, VerificationReport};

/// Longest extracted-text excerpt carried in a report, in characters
pub const MAX_EXTRACTED_TEXT_CHARS: usize = 500;

/// Build a `verified`/`suspicious` report from a completed analysis
pub fn build_report(analysis: AnalysisResult, raw_blocks: Vec<TextBlock>) -> VerificationReport {
    let status = if analysis.is_valid {
        ReportStatus::Verified
    } else {
        ReportStatus::Suspicious
    };

    VerificationReport {
        status,
        confidence_score: analysis.confidence_percent,
        total_text_blocks: analysis.total_blocks,
        low_confidence_blocks: analysis.low_confidence_blocks,
        issues: analysis.issues,
        extracted_text: truncate_chars(&analysis.joined_text, MAX_EXTRACTED_TEXT_CHARS),
        details: raw_blocks,
        case_id: None,
    }
}

/// Fallback report for a document that could not be analyzed
pub fn build_error_report(issue: impl Into<String>) -> VerificationReport {
    VerificationReport {
        status: ReportStatus::Error,
        confidence_score: 0.0,
        total_text_blocks: 0,
        low_confidence_blocks: 0,
        issues: vec![issue.into()],
        extracted_text: String::new(),
        details: Vec::new(),
        case_id: None,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
