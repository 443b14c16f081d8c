use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{
    Answers, ApplicationRecord, ApplicationStatus, NewApplication,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, new: NewApplication) -> Result<ApplicationRecord>;

    /// Newest first.
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationRecord>>;

    async fn get(&self, id: Uuid) -> Result<Option<ApplicationRecord>>;

    /// Moves a pending application to `status`, stamping reviewer and time.
    /// Returns `None` when the record is missing or no longer pending.
    async fn review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewer: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>>;
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: Uuid,
    full_name: String,
    email: String,
    phone_number: String,
    answers: Json<Answers>,
    video_url: Option<String>,
    status: ApplicationStatus,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<String>,
}

impl From<ApplicationRow> for ApplicationRecord {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            answers: row.answers.0,
            video_url: row.video_url,
            status: row.status,
            submitted_at: row.submitted_at,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
        }
    }
}

const COLUMNS: &str = "id, full_name, email, phone_number, answers, video_url, status, submitted_at, reviewed_at, reviewed_by";

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn insert(&self, new: NewApplication) -> Result<ApplicationRecord> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (id, full_name, email, phone_number, answers, video_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.full_name)
        .bind(new.email)
        .bind(new.phone_number)
        .bind(Json(new.answers))
        .bind(new.video_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationRecord>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM applications
            WHERE $1::application_status IS NULL OR status = $1
            ORDER BY submitted_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ApplicationRecord>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewer: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE applications
            SET status = $2, reviewed_by = $3, reviewed_at = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }
}
