use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A pixel coordinate, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point(pub i32, pub i32);

impl Point {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }
}

/// One OCR-detected text region
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub confidence: f64, // 0.0 ..= 1.0
    pub bbox: [Point; 4], // Clockwise from top-left
}

impl TextBlock {
    pub fn new(text: impl Into<String>, confidence: f64, bbox: [Point; 4]) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox,
        }
    }

    /// Build a block from an axis-aligned rectangle
    pub fn from_rect(
        text: impl Into<String>,
        confidence: f64,
        left: i32,
        top: i32,
        width: i32,
        height: i32,
    ) -> Self {
        let right = left + width;
        let bottom = top + height;
        Self::new(
            text,
            confidence,
            [
                Point(left, top),
                Point(right, top),
                Point(right, bottom),
                Point(left, bottom),
            ],
        )
    }

    /// Vertical position of the first polygon point
    pub fn top(&self) -> i32 {
        self.bbox[0].y()
    }
}

/// Output of the anomaly analyzer for one document
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub is_valid: bool,
    pub confidence_percent: f64, // 0.0 ..= 100.0, two decimals
    pub total_blocks: usize,
    pub low_confidence_blocks: usize,
    pub issues: Vec<String>,
    pub joined_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Verified,
    Suspicious,
    Error,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Verified => write!(f, "verified"),
            ReportStatus::Suspicious => write!(f, "suspicious"),
            ReportStatus::Error => write!(f, "error"),
        }
    }
}

/// Client-facing verification artifact
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VerificationReport {
    pub status: ReportStatus,
    pub confidence_score: f64,
    pub total_text_blocks: usize,
    pub low_confidence_blocks: usize,
    pub issues: Vec<String>,
    pub extracted_text: String,
    pub details: Vec<TextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
}

/// Lifecycle state of a review case
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl CaseStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CaseStatus::Pending)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Pending => write!(f, "pending"),
            CaseStatus::Approved => write!(f, "approved"),
            CaseStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for CaseStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CaseStatus::Pending),
            "approved" => Ok(CaseStatus::Approved),
            "rejected" => Ok(CaseStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Operator decision on a pending case
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(self) -> CaseStatus {
        match self {
            Decision::Approved => CaseStatus::Approved,
            Decision::Rejected => CaseStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.status().fmt(f)
    }
}

/// A unit of pending human judgment over one report
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewCase {
    pub case_id: String,
    pub report: VerificationReport,
    pub status: CaseStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl ReviewCase {
    /// New case in `pending`, stamped now
    pub fn pending(case_id: impl Into<String>, report: VerificationReport) -> Self {
        Self {
            case_id: case_id.into(),
            report,
            status: CaseStatus::Pending,
            remarks: None,
            submitted_at: Utc::now(),
            decided_at: None,
        }
    }
}
