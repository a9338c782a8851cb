//! Shared application state

use std::sync::Arc;

use review_queue::{CaseStore, MemoryCaseStore, ReviewQueue, SqliteCaseStore, StoreError};
use tracing::info;

use crate::config::Config;
use crate::service::VerificationService;

pub struct AppState {
    pub service: VerificationService,
}

impl AppState {
    pub fn new(service: VerificationService) -> Self {
        Self { service }
    }

    /// Start the OCR engine and open the case store named by `config`
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let extractor = ocr_adapter::connect(&config.ocr_config()).await;

        let store: Arc<dyn CaseStore> = match &config.database_url {
            Some(url) => Arc::new(SqliteCaseStore::connect(url).await?),
            None => {
                info!("DATABASE_URL not set, review cases are kept in memory only");
                Arc::new(MemoryCaseStore::new())
            }
        };

        let queue = ReviewQueue::new(store, config.decision_policy());
        info!("Decision policy: {:?}", queue.policy());

        Ok(Self::new(VerificationService::new(
            extractor,
            queue,
            config.extraction_timeout(),
        )))
    }
}
