//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ocr_adapter::{EngineChoice, OcrConfig};
use review_queue::DecisionPolicy;

/// Default upload ceiling: 20 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Command-line arguments for the verification server
#[derive(Parser, Debug, Clone)]
#[command(name = "verification-api")]
#[command(about = "OCR-based document verification service with a manual review queue")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// OCR engine to start
    #[arg(long, env = "OCR_ENGINE", value_enum, default_value_t = OcrEngineArg::Tesseract)]
    pub ocr_engine: OcrEngineArg,

    /// Tesseract language codes, joined with '+'
    #[arg(long, env = "OCR_LANG", default_value = "eng")]
    pub ocr_lang: String,

    /// Path to the tesseract executable
    #[arg(long, env = "TESSERACT_BIN", default_value = "tesseract")]
    pub tesseract_bin: PathBuf,

    /// Path to the pdftoppm executable used for PDF uploads
    #[arg(long, env = "PDFTOPPM_BIN", default_value = "pdftoppm")]
    pub pdftoppm_bin: PathBuf,

    /// Extraction timeout in milliseconds
    #[arg(long, env = "EXTRACTION_TIMEOUT_MS", default_value = "30000")]
    pub extraction_timeout_ms: u64,

    /// SQLite database URL; cases stay in memory when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Behaviour when a decided case receives another decision
    #[arg(long, env = "DECISION_POLICY", value_enum, default_value_t = PolicyArg::Strict)]
    pub decision_policy: PolicyArg,

    /// Maximum accepted upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEngineArg {
    Tesseract,
    /// Run without OCR; every upload yields an error report
    #[value(name = "none")]
    Disabled,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Strict,
    Overwrite,
}

impl Config {
    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig {
            engine: match self.ocr_engine {
                OcrEngineArg::Tesseract => EngineChoice::Tesseract,
                OcrEngineArg::Disabled => EngineChoice::Disabled,
            },
            tesseract_bin: self.tesseract_bin.clone(),
            pdftoppm_bin: self.pdftoppm_bin.clone(),
            lang: self.ocr_lang.clone(),
        }
    }

    pub fn decision_policy(&self) -> DecisionPolicy {
        match self.decision_policy {
            PolicyArg::Strict => DecisionPolicy::Strict,
            PolicyArg::Overwrite => DecisionPolicy::Overwrite,
        }
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }
}
