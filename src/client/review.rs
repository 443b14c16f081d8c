use serde_json::json;
use uuid::Uuid;

use super::session::Session;
use super::{read_json, ApiClient, ClientError};
use crate::dto::admin_dto::{AdminSummary, CreateAdminRequest};
use crate::dto::application_dto::StatsResponse;
use crate::models::admin::AdminRole;
use crate::models::application::{ApplicationRecord, ApplicationStatus};

/// Admin-side calls. Every request carries the session's bearer token; the
/// server takes the reviewer identity from it.
#[derive(Clone, Debug)]
pub struct ReviewClient {
    api: ApiClient,
}

impl ReviewClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Newest submission first.
    pub async fn list_applications(
        &self,
        session: &Session,
    ) -> Result<Vec<ApplicationRecord>, ClientError> {
        let url = self.api.endpoint("api/admin/applications")?;
        let resp = self
            .api
            .http()
            .get(url)
            .bearer_auth(&session.token)
            .send()
            .await?;
        let mut records: Vec<ApplicationRecord> = read_json(resp).await?;
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    pub async fn get_application(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<ApplicationRecord, ClientError> {
        let url = self.api.endpoint(&format!("api/admin/applications/{}", id))?;
        let resp = self
            .api
            .http()
            .get(url)
            .bearer_auth(&session.token)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Failures are logged, not raised; `false` leaves the caller's view as
    /// it was.
    pub async fn set_status(&self, session: &Session, id: Uuid, status: ApplicationStatus) -> bool {
        match self.try_set_status(session, id, status).await {
            Ok(record) => {
                tracing::info!(%id, status = %record.status, "application status updated");
                true
            }
            Err(e) => {
                tracing::warn!(%id, %status, error = %e, "failed to update application status");
                false
            }
        }
    }

    async fn try_set_status(
        &self,
        session: &Session,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, ClientError> {
        let url = self
            .api
            .endpoint(&format!("api/admin/applications/{}/status", id))?;
        let resp = self
            .api
            .http()
            .post(url)
            .bearer_auth(&session.token)
            .json(&json!({ "status": status }))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn create_admin(
        &self,
        session: &Session,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> bool {
        let payload = CreateAdminRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        match self.try_create_admin(session, &payload).await {
            Ok(admin) => {
                tracing::info!(email = %admin.email, role = %admin.role, "admin created");
                true
            }
            Err(e) => {
                tracing::warn!(%email, error = %e, "failed to create admin");
                false
            }
        }
    }

    async fn try_create_admin(
        &self,
        session: &Session,
        payload: &CreateAdminRequest,
    ) -> Result<AdminSummary, ClientError> {
        let url = self.api.endpoint("api/admin/admins")?;
        let resp = self
            .api
            .http()
            .post(url)
            .bearer_auth(&session.token)
            .json(payload)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn list_admins(&self, session: &Session) -> Result<Vec<AdminSummary>, ClientError> {
        let url = self.api.endpoint("api/admin/admins")?;
        let resp = self
            .api
            .http()
            .get(url)
            .bearer_auth(&session.token)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn stats(&self, session: &Session) -> Result<StatsResponse, ClientError> {
        let url = self.api.endpoint("api/admin/stats")?;
        let resp = self
            .api
            .http()
            .get(url)
            .bearer_auth(&session.token)
            .send()
            .await?;
        read_json(resp).await
    }
}
