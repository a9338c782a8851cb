//! Case storage abstraction
//!
//! The queue owns case semantics; stores only persist records. Any backend
//! must return cases in submission order.

use async_trait::async_trait;
use shared_types::{CaseStatus, ReviewCase};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record {case_id}: {reason}")]
    Corrupt { case_id: String, reason: String },

    #[error("Could not allocate a unique case id after {0} attempts")]
    IdCollision(usize),
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn get(&self, case_id: &str) -> Result<Option<ReviewCase>, StoreError>;

    /// Insert a new case or replace an existing one, keeping its position
    async fn put(&self, case: ReviewCase) -> Result<(), StoreError>;

    /// All cases in submission order
    async fn list(&self) -> Result<Vec<ReviewCase>, StoreError>;

    async fn list_by_status(&self, status: CaseStatus) -> Result<Vec<ReviewCase>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|case| case.status == status)
            .collect())
    }

    /// Release backend resources at shutdown
    async fn close(&self) {}
}
