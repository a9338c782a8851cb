//! Tests for the verification server
//!
//! - Property tests for upload acceptance and report shape
//! - HTTP endpoint tests over the full router with canned OCR output

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use shared_types::{ReportStatus, TextBlock};
    use verification_engine::VerificationEngine;

    use crate::api::accepted_kind;

    /// Content types the upload endpoint never accepts
    fn unsupported_content_type() -> impl Strategy<Value = String> {
        prop_oneof![
            "text/[a-z]{3,10}",
            "application/(json|zip|msword|xml)",
            "image/(gif|bmp|tiff|webp|svg\\+xml)",
            "video/[a-z]{3,6}",
        ]
    }

    fn block() -> impl Strategy<Value = TextBlock> {
        ("[A-Za-z ]{1,20}", 0.0f64..=1.0, 0i32..500, 0i32..2000)
            .prop_map(|(text, conf, left, top)| TextBlock::from_rect(text, conf, left, top, 80, 20))
    }

    proptest! {
        /// Property: unsupported declared types are rejected whatever the bytes
        #[test]
        fn unsupported_types_rejected(ct in unsupported_content_type(), data in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assert!(accepted_kind(Some(&ct), &data).is_err());
        }

        /// Property: undeclared uploads without a known signature are rejected
        #[test]
        fn unknown_signatures_rejected(data in prop::collection::vec(0x00u8..0x20, 0..64)) {
            prop_assert!(accepted_kind(None, &data).is_err());
            prop_assert!(accepted_kind(Some("application/octet-stream"), &data).is_err());
        }

        /// Property: reports are never `error` and never carry more than 500 characters
        #[test]
        fn reports_from_text_are_bounded(blocks in prop::collection::vec(block(), 0..40)) {
            let report = VerificationEngine::new().verify_blocks(blocks.clone());

            prop_assert_ne!(report.status, ReportStatus::Error);
            prop_assert!(report.extracted_text.chars().count() <= 500);
            prop_assert_eq!(report.details, blocks);
            prop_assert!(!report.issues.is_empty());
        }
    }
}

#[cfg(test)]
mod http_tests {
    //! HTTP endpoint integration tests using axum-test

    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use ocr_adapter::{FixtureExtractor, TextExtractor, UnavailableExtractor};
    use pretty_assertions::assert_eq;
    use review_queue::ReviewQueue;
    use serde_json::{json, Value};
    use shared_types::TextBlock;

    use crate::build_router;
    use crate::service::VerificationService;
    use crate::state::AppState;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    /// Create a test server with the full router
    fn create_test_server(extractor: impl TextExtractor + 'static) -> TestServer {
        let service = VerificationService::new(
            Arc::new(extractor),
            ReviewQueue::in_memory(),
            Duration::from_secs(5),
        );
        let app = build_router(Arc::new(AppState::new(service)), 1024 * 1024);

        TestServer::new(app).unwrap()
    }

    fn clean_certificate() -> Vec<TextBlock> {
        (0..5)
            .map(|i| {
                TextBlock::from_rect(
                    format!("University of Mysore line {}", i),
                    0.95,
                    40,
                    60 + i * 50,
                    400,
                    32,
                )
            })
            .collect()
    }

    fn png_upload() -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(PNG.to_vec())
                .file_name("certificate.png")
                .mime_type("image/png"),
        )
    }

    #[tokio::test]
    async fn test_health_operational() {
        let server = create_test_server(FixtureExtractor::new(Vec::new()));
        let response = server.get("/verification/health").await;
        response.assert_status_ok();

        let json = response.json::<Value>();
        assert_eq!(json["status"], "operational");
        assert_eq!(json["ocr_engine"], "fixture");
        assert_eq!(json["languages_supported"], json!(["en"]));
    }

    #[tokio::test]
    async fn test_health_degraded() {
        let server = create_test_server(UnavailableExtractor::new("tesseract not found"));
        let response = server.get("/verification/health").await;
        response.assert_status_ok();

        let json = response.json::<Value>();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["languages_supported"], json!([]));
    }

    #[tokio::test]
    async fn test_verify_then_approve() {
        let server = create_test_server(FixtureExtractor::new(clean_certificate()));

        let response = server.post("/verify-document").multipart(png_upload()).await;
        response.assert_status_ok();

        let report = response.json::<Value>();
        assert_eq!(report["status"], "verified");
        assert_eq!(report["confidence_score"], 95.0);
        assert_eq!(report["total_text_blocks"], 5);
        assert_eq!(report["issues"], json!(["Document appears authentic"]));
        assert_eq!(report["details"].as_array().unwrap().len(), 5);
        assert_eq!(report["details"][0]["bbox"], json!([[40, 60], [440, 60], [440, 92], [40, 92]]));
        let case_id = report["case_id"].as_str().unwrap().to_string();

        let queue = server.get("/verification/queue").await.json::<Value>();
        let queue = queue.as_array().unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0]["case_id"], case_id.as_str());
        assert_eq!(queue[0]["status"], "pending");
        assert!(queue[0]["timestamp"].is_string());

        let response = server
            .post(&format!("/verification/{}/approve", case_id))
            .json(&json!({ "remarks": "ok" }))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "status": "approved", "case_id": case_id })
        );

        let queue = server.get("/verification/queue").await.json::<Value>();
        assert_eq!(queue, json!([]));

        let case = server
            .get(&format!("/verification/{}", case_id))
            .await
            .json::<Value>();
        assert_eq!(case["status"], "approved");
        assert_eq!(case["remarks"], "ok");
        assert!(case["decided_at"].is_string());
    }

    #[tokio::test]
    async fn test_low_confidence_document_is_suspicious() {
        let blocks = (0..10)
            .map(|i| {
                let conf = if i < 4 { 0.5 } else { 0.95 };
                TextBlock::from_rect(format!("Row {}", i), conf, 20, 30 + i * 40, 300, 28)
            })
            .collect();
        let server = create_test_server(FixtureExtractor::new(blocks));

        let report = server
            .post("/verify-document")
            .multipart(png_upload())
            .await
            .json::<Value>();

        assert_eq!(report["status"], "suspicious");
        assert_eq!(report["low_confidence_blocks"], 4);
        assert_eq!(
            report["issues"],
            json!(["High number of low-confidence text blocks (4)"])
        );
    }

    #[tokio::test]
    async fn test_reject_without_body() {
        let server = create_test_server(FixtureExtractor::new(clean_certificate()));
        let case_id = server
            .post("/verify-document")
            .multipart(png_upload())
            .await
            .json::<Value>()["case_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = server
            .post(&format!("/verification/{}/reject", case_id))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "rejected");

        let case = server
            .get(&format!("/verification/{}", case_id))
            .await
            .json::<Value>();
        assert_eq!(case["status"], "rejected");
        assert!(case["remarks"].is_null());
    }

    #[tokio::test]
    async fn test_second_decision_refused() {
        let server = create_test_server(FixtureExtractor::new(clean_certificate()));
        let case_id = server
            .post("/verify-document")
            .multipart(png_upload())
            .await
            .json::<Value>()["case_id"]
            .as_str()
            .unwrap()
            .to_string();

        server
            .post(&format!("/verification/{}/approve", case_id))
            .await
            .assert_status_ok();

        let response = server
            .post(&format!("/verification/{}/reject", case_id))
            .json(&json!({ "remarks": "too late" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "error": "Case not found" }));

        let case = server
            .get(&format!("/verification/{}", case_id))
            .await
            .json::<Value>();
        assert_eq!(case["status"], "approved");
        assert!(case["remarks"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_case() {
        let server = create_test_server(FixtureExtractor::new(Vec::new()));

        let response = server.post("/verification/deadbeef/approve").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "error": "Case not found" }));

        server
            .get("/verification/deadbeef")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_file_type() {
        let server = create_test_server(FixtureExtractor::new(clean_certificate()));

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"hello world".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );
        let response = server.post("/verify-document").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Only image files (JPG, PNG) and PDFs are supported"
        );

        let queue = server.get("/verification/queue").await.json::<Value>();
        assert_eq!(queue, json!([]));
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let server = create_test_server(FixtureExtractor::new(clean_certificate()));

        let form = MultipartForm::new().add_text("document", "nothing here");
        let response = server.post("/verify-document").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unavailable_ocr_still_queues_error_report() {
        let server = create_test_server(UnavailableExtractor::new("tesseract not found"));

        let response = server.post("/verify-document").multipart(png_upload()).await;
        response.assert_status_ok();

        let report = response.json::<Value>();
        assert_eq!(report["status"], "error");
        assert_eq!(report["confidence_score"], 0.0);
        assert_eq!(
            report["issues"],
            json!(["OCR service not available. Please install required dependencies."])
        );

        let queue = server.get("/verification/queue").await.json::<Value>();
        assert_eq!(queue[0]["report"]["status"], "error");
    }
}
