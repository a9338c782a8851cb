use crate::patterns::{find_keywords, SUSPICIOUS_KEYWORDS};

/// Flags editing-tool or specimen markers anywhere in the document text.
///
/// `text_lower` is the space-joined, lower-cased text of every block. Matching
/// is plain substring search, not tokenized.
pub fn check_suspicious_keywords(text_lower: &str) -> Option<String> {
    let found = find_keywords(text_lower, SUSPICIOUS_KEYWORDS);
    if found.is_empty() {
        None
    } else {
        Some(format!("Suspicious keywords found: {}", found.join(", ")))
    }
}
