pub mod types;

pub use types::{
    AnalysisResult, CaseStatus, Decision, ParseStatusError, Point, ReportStatus, ReviewCase,
    TextBlock, VerificationReport,
};
