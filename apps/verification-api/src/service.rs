//! Verification service façade
//!
//! Wires extraction, analysis, report building and the review queue into the
//! one operation the HTTP layer calls per upload. Every upload produces a
//! report and every report is queued, including error reports.

use std::sync::Arc;
use std::time::Duration;

use ocr_adapter::{ExtractionError, TextExtractor};
use review_queue::{ReviewQueue, StoreError};
use serde::Serialize;
use shared_types::{Decision, ReviewCase, TextBlock, VerificationReport};
use tracing::{info, warn};
use verification_engine::{build_error_report, VerificationEngine};

pub const OCR_UNAVAILABLE_ISSUE: &str =
    "OCR service not available. Please install required dependencies.";

/// Health snapshot returned by `GET /verification/health`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub ocr_engine: String,
    pub languages_supported: Vec<String>,
    pub message: String,
}

pub struct VerificationService {
    extractor: Arc<dyn TextExtractor>,
    engine: VerificationEngine,
    queue: ReviewQueue,
    extraction_timeout: Duration,
}

impl VerificationService {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        queue: ReviewQueue,
        extraction_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            engine: VerificationEngine::new(),
            queue,
            extraction_timeout,
        }
    }

    /// Extract, analyze, report, and queue one uploaded document.
    ///
    /// Extraction failures become `error` reports rather than errors; only a
    /// failing case store is surfaced to the caller.
    pub async fn verify(&self, image: &[u8]) -> Result<VerificationReport, StoreError> {
        let mut report = self.build_report(image).await;
        let case_id = self.queue.submit(report.clone()).await?;

        info!(
            "Document verified as {} (score {:.2}), case {}",
            report.status, report.confidence_score, case_id
        );
        report.case_id = Some(case_id);
        Ok(report)
    }

    pub fn health(&self) -> ServiceHealth {
        match self.extractor.unavailable_reason() {
            Some(reason) => ServiceHealth {
                status: "degraded",
                ocr_engine: self.extractor.engine_name().to_string(),
                languages_supported: Vec::new(),
                message: format!("OCR service not available: {}", reason),
            },
            None => ServiceHealth {
                status: "operational",
                ocr_engine: self.extractor.engine_name().to_string(),
                languages_supported: self.extractor.languages(),
                message: "Document verification service is ready".to_string(),
            },
        }
    }

    pub async fn list_pending(&self) -> Result<Vec<ReviewCase>, StoreError> {
        self.queue.list_pending().await
    }

    pub async fn get_case(&self, case_id: &str) -> Result<Option<ReviewCase>, StoreError> {
        self.queue.get(case_id).await
    }

    pub async fn decide(
        &self,
        case_id: &str,
        decision: Decision,
        remarks: Option<String>,
    ) -> Result<bool, StoreError> {
        self.queue.decide(case_id, decision, remarks).await
    }

    pub async fn shutdown(&self) {
        self.queue.shutdown().await;
    }

    async fn build_report(&self, image: &[u8]) -> VerificationReport {
        match self.extract(image).await {
            Ok(blocks) => self.engine.verify_blocks(blocks),
            Err(e) => {
                warn!("Text extraction failed: {}", e);
                build_error_report(extraction_issue(&e))
            }
        }
    }

    async fn extract(&self, image: &[u8]) -> Result<Vec<TextBlock>, ExtractionError> {
        match tokio::time::timeout(self.extraction_timeout, self.extractor.extract(image)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Timeout(
                self.extraction_timeout.as_millis() as u64,
            )),
        }
    }
}

fn extraction_issue(err: &ExtractionError) -> String {
    if err.is_unavailable() {
        OCR_UNAVAILABLE_ISSUE.to_string()
    } else {
        format!("Verification failed: {}", err)
    }
}
