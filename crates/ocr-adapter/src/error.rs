//! Error types for text extraction

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The engine could not run at all (missing binary, not installed, disabled)
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but failed on this input
    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("OCR timed out after {0}ms")]
    Timeout(u64),
}

impl ExtractionError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ExtractionError::Unavailable(_))
    }
}
