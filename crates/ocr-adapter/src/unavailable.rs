//! Degraded extractor used when no OCR engine could be started

use async_trait::async_trait;
use shared_types::TextBlock;

use crate::error::ExtractionError;
use crate::TextExtractor;

/// Fails every request with [`ExtractionError::Unavailable`]
pub struct UnavailableExtractor {
    reason: String,
}

impl UnavailableExtractor {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for UnavailableExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<TextBlock>, ExtractionError> {
        Err(ExtractionError::Unavailable(self.reason.clone()))
    }

    fn engine_name(&self) -> &str {
        "none"
    }

    fn unavailable_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}
