//! Process-local case store; contents are lost on restart

use std::collections::HashMap;

use async_trait::async_trait;
use shared_types::ReviewCase;
use tokio::sync::RwLock;

use crate::store::{CaseStore, StoreError};

#[derive(Default)]
struct Inner {
    cases: Vec<ReviewCase>,
    index: HashMap<String, usize>,
}

#[derive(Default)]
pub struct MemoryCaseStore {
    inner: RwLock<Inner>,
}

impl MemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaseStore for MemoryCaseStore {
    async fn get(&self, case_id: &str) -> Result<Option<ReviewCase>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .index
            .get(case_id)
            .map(|&slot| inner.cases[slot].clone()))
    }

    async fn put(&self, case: ReviewCase) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.index.get(&case.case_id).copied() {
            Some(slot) => inner.cases[slot] = case,
            None => {
                let slot = inner.cases.len();
                inner.index.insert(case.case_id.clone(), slot);
                inner.cases.push(case);
            }
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReviewCase>, StoreError> {
        Ok(self.inner.read().await.cases.clone())
    }
}
