//! Review queue and case state machine
//!
//! Every verification report becomes a [`ReviewCase`] in `pending`. An
//! operator later approves or rejects it. The queue is the only component
//! allowed to change a case's status or remarks, and it serializes all
//! mutations so concurrent submissions never share an identifier.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```

pub mod memory;
pub mod sqlite;
pub mod store;

use std::sync::Arc;

use chrono::Utc;
use shared_types::{CaseStatus, Decision, ReviewCase, VerificationReport};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use memory::MemoryCaseStore;
pub use sqlite::SqliteCaseStore;
pub use store::{CaseStore, StoreError};

/// Case identifiers are the first characters of a v4 UUID
pub const CASE_ID_LEN: usize = 8;

const MAX_ID_ATTEMPTS: usize = 16;

/// What happens when a decision targets an already decided case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// Terminal states are final; further decisions are refused
    #[default]
    Strict,
    /// A later decision replaces the earlier one
    Overwrite,
}

pub struct ReviewQueue {
    store: Arc<dyn CaseStore>,
    policy: DecisionPolicy,
    write_lock: Mutex<()>,
}

impl ReviewQueue {
    pub fn new(store: Arc<dyn CaseStore>, policy: DecisionPolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Queue backed by process memory with the strict policy
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCaseStore::new()), DecisionPolicy::Strict)
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Store `report` as a new pending case and return its identifier
    pub async fn submit(&self, mut report: VerificationReport) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().await;

        let case_id = self.allocate_id().await?;
        report.case_id = Some(case_id.clone());
        let status = report.status;

        self.store
            .put(ReviewCase::pending(case_id.clone(), report))
            .await?;

        info!("Queued case {} for review (report status: {})", case_id, status);
        Ok(case_id)
    }

    /// Pending cases in submission order
    pub async fn list_pending(&self) -> Result<Vec<ReviewCase>, StoreError> {
        self.store.list_by_status(CaseStatus::Pending).await
    }

    pub async fn get(&self, case_id: &str) -> Result<Option<ReviewCase>, StoreError> {
        self.store.get(case_id).await
    }

    /// Apply an operator decision.
    ///
    /// Returns `false` without touching the queue when the case does not
    /// exist, or when it is already decided under [`DecisionPolicy::Strict`].
    pub async fn decide(
        &self,
        case_id: &str,
        decision: Decision,
        remarks: Option<String>,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let Some(mut case) = self.store.get(case_id).await? else {
            debug!("Decision {} for unknown case {}", decision, case_id);
            return Ok(false);
        };

        if case.status.is_terminal() && self.policy == DecisionPolicy::Strict {
            warn!(
                "Refusing to mark case {} as {}: already {}",
                case_id, decision, case.status
            );
            return Ok(false);
        }

        case.status = decision.status();
        case.remarks = remarks;
        case.decided_at = Some(Utc::now());
        self.store.put(case).await?;

        info!("Case {} marked {}", case_id, decision);
        Ok(true)
    }

    /// Flush and release the backing store
    pub async fn shutdown(&self) {
        let _guard = self.write_lock.lock().await;
        self.store.close().await;
    }

    // Caller holds the write lock
    async fn allocate_id(&self) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = new_case_id();
            if self.store.get(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            warn!("Case id collision on {}, retrying", candidate);
        }
        Err(StoreError::IdCollision(MAX_ID_ATTEMPTS))
    }
}

fn new_case_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CASE_ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::ReportStatus;
    use std::collections::HashSet;

    fn report(status: ReportStatus) -> VerificationReport {
        VerificationReport {
            status,
            confidence_score: 91.2,
            total_text_blocks: 3,
            low_confidence_blocks: 0,
            issues: vec!["Document appears authentic".into()],
            extracted_text: "Statement of Marks".into(),
            details: Vec::new(),
            case_id: None,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_case() {
        let queue = ReviewQueue::in_memory();
        let id = queue.submit(report(ReportStatus::Verified)).await.unwrap();

        assert_eq!(id.len(), CASE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        let pending = queue.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].case_id, id);
        assert_eq!(pending[0].status, CaseStatus::Pending);
        assert_eq!(pending[0].report.case_id.as_deref(), Some(id.as_str()));
        assert!(pending[0].remarks.is_none());
    }

    #[tokio::test]
    async fn test_error_reports_are_queued_too() {
        let queue = ReviewQueue::in_memory();
        queue.submit(report(ReportStatus::Error)).await.unwrap();
        assert_eq!(queue.list_pending().await.unwrap()[0].report.status, ReportStatus::Error);
    }

    #[tokio::test]
    async fn test_pending_listed_in_submission_order() {
        let queue = ReviewQueue::in_memory();
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(queue.submit(report(ReportStatus::Suspicious)).await.unwrap());
        }

        let listed: Vec<_> = queue
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.case_id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_approve_removes_from_pending() {
        let queue = ReviewQueue::in_memory();
        let id = queue.submit(report(ReportStatus::Verified)).await.unwrap();

        assert!(queue
            .decide(&id, Decision::Approved, Some("ok".into()))
            .await
            .unwrap());
        assert!(queue.list_pending().await.unwrap().is_empty());

        let case = queue.get(&id).await.unwrap().unwrap();
        assert_eq!(case.status, CaseStatus::Approved);
        assert_eq!(case.remarks.as_deref(), Some("ok"));
        assert!(case.decided_at.is_some());
    }

    #[tokio::test]
    async fn test_strict_policy_refuses_second_decision() {
        let queue = ReviewQueue::in_memory();
        let id = queue.submit(report(ReportStatus::Verified)).await.unwrap();

        assert!(queue.decide(&id, Decision::Approved, Some("ok".into())).await.unwrap());
        assert!(!queue
            .decide(&id, Decision::Rejected, Some("changed my mind".into()))
            .await
            .unwrap());

        let case = queue.get(&id).await.unwrap().unwrap();
        assert_eq!(case.status, CaseStatus::Approved);
        assert_eq!(case.remarks.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_overwrite_policy_replaces_decision() {
        let queue = ReviewQueue::new(Arc::new(MemoryCaseStore::new()), DecisionPolicy::Overwrite);
        let id = queue.submit(report(ReportStatus::Suspicious)).await.unwrap();

        assert!(queue.decide(&id, Decision::Approved, None).await.unwrap());
        assert!(queue
            .decide(&id, Decision::Rejected, Some("forged seal".into()))
            .await
            .unwrap());

        let case = queue.get(&id).await.unwrap().unwrap();
        assert_eq!(case.status, CaseStatus::Rejected);
        assert_eq!(case.remarks.as_deref(), Some("forged seal"));
        assert!(queue.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_case_leaves_queue_unchanged() {
        let queue = ReviewQueue::in_memory();
        let id = queue.submit(report(ReportStatus::Verified)).await.unwrap();
        let before = queue.list_pending().await.unwrap();

        assert!(!queue
            .decide("nonexistent", Decision::Rejected, None)
            .await
            .unwrap());
        assert_eq!(queue.list_pending().await.unwrap(), before);
        assert_eq!(before[0].case_id, id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submits_get_distinct_ids() {
        let queue = Arc::new(ReviewQueue::in_memory());
        let handles: Vec<_> = (0..64)
            .map(|_| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.submit(report(ReportStatus::Verified)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(queue.list_pending().await.unwrap().len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decisions_on_different_cases() {
        let queue = Arc::new(ReviewQueue::in_memory());
        let mut ids = Vec::new();
        for _ in 0..20 {
            ids.push(queue.submit(report(ReportStatus::Suspicious)).await.unwrap());
        }

        let handles: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let queue = Arc::clone(&queue);
                let id = id.clone();
                let decision = if i % 2 == 0 {
                    Decision::Approved
                } else {
                    Decision::Rejected
                };
                tokio::spawn(async move { queue.decide(&id, decision, None).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        assert!(queue.list_pending().await.unwrap().is_empty());
        for (i, id) in ids.iter().enumerate() {
            let expected = if i % 2 == 0 {
                CaseStatus::Approved
            } else {
                CaseStatus::Rejected
            };
            assert_eq!(queue.get(id).await.unwrap().unwrap().status, expected);
        }
    }

    #[tokio::test]
    async fn test_sqlite_backed_queue() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("queue.db").display());
        let store = SqliteCaseStore::connect(&url).await.unwrap();
        let queue = ReviewQueue::new(Arc::new(store), DecisionPolicy::Strict);

        let id = queue.submit(report(ReportStatus::Verified)).await.unwrap();
        assert_eq!(queue.list_pending().await.unwrap().len(), 1);
        assert!(queue.decide(&id, Decision::Rejected, None).await.unwrap());
        assert!(!queue.decide(&id, Decision::Approved, None).await.unwrap());
        assert!(queue.list_pending().await.unwrap().is_empty());

        queue.shutdown().await;
    }
}
