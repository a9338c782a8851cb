//! API handlers for the verification server
//!
//! Provides REST endpoints for:
//! - Document upload and verification
//! - Review queue listing and lookup
//! - Operator decisions

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use ocr_adapter::DocumentKind;
use serde::{Deserialize, Serialize};
use shared_types::{Decision, ReviewCase, VerificationReport};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::service::ServiceHealth;
use crate::state::AppState;

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Optional body for approve and reject
#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Body for approve and reject.
///
/// A refused decision (unknown or already decided case) is an ordinary
/// answer, not an HTTP error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DecisionResponse {
    Applied {
        status: &'static str,
        case_id: String,
    },
    Refused { error: &'static str },
}

pub const CASE_NOT_FOUND: &str = "Case not found";

/// Handler: POST /verify-document
pub async fn handle_verify_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<VerificationReport>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let kind = accepted_kind(content_type.as_deref(), &data)?;
        info!(
            "Received {} ({}, {} bytes) for verification",
            filename,
            kind,
            data.len()
        );

        let report = state.service.verify(&data).await?;
        return Ok(Json(report));
    }

    Err(ApiError::InvalidRequest(format!(
        "Missing '{}' field in multipart body",
        FILE_FIELD
    )))
}

/// Decide whether an upload is a supported document.
///
/// A declared content type must be JPEG, PNG or PDF. Uploads without one,
/// or declared as a generic byte stream, are judged by their magic bytes.
pub(crate) fn accepted_kind(
    content_type: Option<&str>,
    data: &[u8],
) -> Result<DocumentKind, ApiError> {
    match content_type {
        Some(ct) if !is_generic(ct) => DocumentKind::from_content_type(ct)
            .ok_or_else(|| ApiError::InvalidFileType(ct.to_string())),
        _ => DocumentKind::sniff(data).ok_or_else(|| {
            ApiError::InvalidFileType(content_type.unwrap_or("unknown").to_string())
        }),
    }
}

fn is_generic(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/octet-stream"))
        .unwrap_or(false)
}

/// Handler: GET /verification/health
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<ServiceHealth> {
    Json(state.service.health())
}

/// Handler: GET /verification/queue
pub async fn handle_list_queue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReviewCase>>, ApiError> {
    let pending = state.service.list_pending().await?;
    debug!("Review queue has {} pending cases", pending.len());
    Ok(Json(pending))
}

/// Handler: GET /verification/:case_id
pub async fn handle_get_case(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
) -> Result<Json<ReviewCase>, ApiError> {
    state
        .service
        .get_case(&case_id)
        .await?
        .map(Json)
        .ok_or(ApiError::CaseNotFound(case_id))
}

/// Handler: POST /verification/:case_id/approve
pub async fn handle_approve(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    body: Option<Json<DecisionRequest>>,
) -> Result<Json<DecisionResponse>, ApiError> {
    decide(&state, case_id, Decision::Approved, body).await
}

/// Handler: POST /verification/:case_id/reject
pub async fn handle_reject(
    State(state): State<Arc<AppState>>,
    Path(case_id): Path<String>,
    body: Option<Json<DecisionRequest>>,
) -> Result<Json<DecisionResponse>, ApiError> {
    decide(&state, case_id, Decision::Rejected, body).await
}

async fn decide(
    state: &AppState,
    case_id: String,
    decision: Decision,
    body: Option<Json<DecisionRequest>>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let remarks = body.and_then(|Json(req)| req.remarks);

    if state.service.decide(&case_id, decision, remarks).await? {
        Ok(Json(DecisionResponse::Applied {
            status: match decision {
                Decision::Approved => "approved",
                Decision::Rejected => "rejected",
            },
            case_id,
        }))
    } else {
        debug!("Decision {} refused for case {}", decision, case_id);
        Ok(Json(DecisionResponse::Refused {
            error: CASE_NOT_FOUND,
        }))
    }
}
