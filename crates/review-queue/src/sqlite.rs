//! SQLite-backed case store
//!
//! Reports are stored as JSON; an autoincrement sequence column preserves
//! submission order across updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{CaseStatus, ReviewCase, VerificationReport};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::store::{CaseStore, StoreError};

const SELECT_CASES: &str = r#"
    SELECT case_id, report_json, status, remarks, submitted_at, decided_at
    FROM review_cases
"#;

pub struct SqliteCaseStore {
    pool: SqlitePool,
}

impl SqliteCaseStore {
    /// Connect to `database_url` (e.g. `sqlite:cases.db?mode=rwc`) and migrate
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to case database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        tracing::info!("Running case store migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS review_cases (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                case_id TEXT NOT NULL UNIQUE,
                report_json TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                remarks TEXT,
                submitted_at TEXT NOT NULL,
                decided_at TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_review_cases_status ON review_cases(status)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl CaseStore for SqliteCaseStore {
    async fn get(&self, case_id: &str) -> Result<Option<ReviewCase>, StoreError> {
        let row = sqlx::query(&format!("{} WHERE case_id = ?", SELECT_CASES))
            .bind(case_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_case).transpose()
    }

    async fn put(&self, case: ReviewCase) -> Result<(), StoreError> {
        let report_json = serde_json::to_string(&case.report)?;

        sqlx::query(
            r#"
            INSERT INTO review_cases (case_id, report_json, status, remarks, submitted_at, decided_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(case_id) DO UPDATE SET
                report_json = excluded.report_json,
                status = excluded.status,
                remarks = excluded.remarks,
                decided_at = excluded.decided_at
            "#,
        )
        .bind(&case.case_id)
        .bind(&report_json)
        .bind(case.status.to_string())
        .bind(&case.remarks)
        .bind(case.submitted_at.to_rfc3339())
        .bind(case.decided_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReviewCase>, StoreError> {
        let rows = sqlx::query(&format!("{} ORDER BY seq", SELECT_CASES))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_case).collect()
    }

    async fn list_by_status(&self, status: CaseStatus) -> Result<Vec<ReviewCase>, StoreError> {
        let rows = sqlx::query(&format!("{} WHERE status = ? ORDER BY seq", SELECT_CASES))
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_case).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn decode_case(row: &SqliteRow) -> Result<ReviewCase, StoreError> {
    let case_id: String = row.try_get("case_id")?;
    let report_json: String = row.try_get("report_json")?;
    let status: String = row.try_get("status")?;
    let submitted_at: String = row.try_get("submitted_at")?;
    let decided_at: Option<String> = row.try_get("decided_at")?;

    let corrupt = |reason: String| StoreError::Corrupt {
        case_id: case_id.clone(),
        reason,
    };

    let report: VerificationReport = serde_json::from_str(&report_json)?;
    let status = status
        .parse::<CaseStatus>()
        .map_err(|e| corrupt(e.to_string()))?;
    let submitted_at = parse_timestamp(&submitted_at).map_err(&corrupt)?;
    let decided_at = decided_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()
        .map_err(&corrupt)?;

    Ok(ReviewCase {
        case_id: case_id.clone(),
        report,
        status,
        remarks: row.try_get("remarks")?,
        submitted_at,
        decided_at,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp {:?}: {}", value, e))
}
