use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::admin_repo::AdminRepository;
use super::application_repo::ApplicationRepository;
use crate::error::{Error, Result};
use crate::models::admin::{AdminAccount, AdminRole};
use crate::models::application::{ApplicationRecord, ApplicationStatus, NewApplication};

/// Process-local application store, used when no `DATABASE_URL` is set and
/// in tests.
#[derive(Default)]
pub struct MemoryApplicationRepository {
    records: RwLock<Vec<ApplicationRecord>>,
}

impl MemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
    async fn insert(&self, new: NewApplication) -> Result<ApplicationRecord> {
        let record = ApplicationRecord {
            id: Uuid::new_v4(),
            full_name: new.full_name,
            email: new.email,
            phone_number: new.phone_number,
            answers: new.answers,
            video_url: new.video_url,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationRecord>> {
        let records = self.records.read().await;
        let mut out: Vec<ApplicationRecord> = records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ApplicationRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewer: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ApplicationRecord>> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if !record.status.can_transition_to(status) {
            return Ok(None);
        }
        record.status = status;
        record.reviewed_at = Some(at);
        record.reviewed_by = Some(reviewer.to_string());
        Ok(Some(record.clone()))
    }
}

#[derive(Default)]
pub struct MemoryAdminRepository {
    accounts: RwLock<Vec<AdminAccount>>,
}

impl MemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for MemoryAdminRepository {
    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminAccount> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)) {
            return Err(Error::Conflict(format!(
                "An admin with email {} already exists",
                email
            )));
        }
        let account = AdminAccount {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<AdminAccount>> {
        Ok(self.accounts.read().await.clone())
    }
}
