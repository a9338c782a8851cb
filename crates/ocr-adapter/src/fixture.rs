//! Canned extractors for tests and demos that must run without Tesseract

use async_trait::async_trait;
use shared_types::TextBlock;

use crate::error::ExtractionError;
use crate::TextExtractor;

/// Returns a preset result regardless of the image content
pub struct FixtureExtractor {
    result: Result<Vec<TextBlock>, ExtractionError>,
}

impl FixtureExtractor {
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        Self { result: Ok(blocks) }
    }

    pub fn failing(error: ExtractionError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl TextExtractor for FixtureExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<TextBlock>, ExtractionError> {
        self.result.clone()
    }

    fn engine_name(&self) -> &str {
        "fixture"
    }

    fn languages(&self) -> Vec<String> {
        vec!["en".to_string()]
    }
}
