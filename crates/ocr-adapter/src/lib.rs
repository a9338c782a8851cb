//! Text extraction capability
//!
//! The OCR engine is an external collaborator; this crate normalizes whatever
//! it returns into [`TextBlock`]s and keeps "the engine could not run"
//! distinguishable from "the engine found no text".
//!
//! Engine selection happens once at startup through [`connect`]. When the
//! configured engine cannot be started the service gets an
//! [`UnavailableExtractor`] instead of failing to boot.

pub mod error;
pub mod fixture;
pub mod kind;
pub mod pdf;
pub mod tesseract;
pub mod tsv;
pub mod unavailable;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::TextBlock;
use tracing::{info, warn};

pub use error::ExtractionError;
pub use fixture::FixtureExtractor;
pub use kind::DocumentKind;
pub use tesseract::TesseractEngine;
pub use unavailable::UnavailableExtractor;

/// An OCR capability: image bytes in, ordered text blocks out
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Blocks come back in engine order; an empty vector means the engine
    /// ran and found nothing.
    async fn extract(&self, image: &[u8]) -> Result<Vec<TextBlock>, ExtractionError>;

    /// Engine name shown by the health endpoint
    fn engine_name(&self) -> &str;

    fn languages(&self) -> Vec<String> {
        Vec::new()
    }

    /// Why this extractor cannot serve requests, if it cannot
    fn unavailable_reason(&self) -> Option<&str> {
        None
    }
}

/// Which engine the deployment asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineChoice {
    Tesseract,
    Disabled,
}

/// OCR configuration
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub engine: EngineChoice,
    pub tesseract_bin: PathBuf,
    pub pdftoppm_bin: PathBuf,
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: EngineChoice::Tesseract,
            tesseract_bin: PathBuf::from("tesseract"),
            pdftoppm_bin: PathBuf::from("pdftoppm"),
            lang: "eng".to_string(),
        }
    }
}

/// Select the extractor for this process, degrading instead of failing
pub async fn connect(config: &OcrConfig) -> Arc<dyn TextExtractor> {
    match config.engine {
        EngineChoice::Disabled => {
            warn!("OCR disabled by configuration; verification will return error reports");
            Arc::new(UnavailableExtractor::new("OCR disabled by configuration"))
        }
        EngineChoice::Tesseract => {
            let engine = TesseractEngine::new(&config.tesseract_bin, &config.lang)
                .with_pdftoppm(&config.pdftoppm_bin);
            match engine.probe().await {
                Ok(version) => {
                    info!("OCR engine ready: {} (lang={})", version, config.lang);
                    Arc::new(engine)
                }
                Err(e) => {
                    warn!("Failed to initialize OCR engine: {}", e);
                    Arc::new(UnavailableExtractor::new(e.to_string()))
                }
            }
        }
    }
}
