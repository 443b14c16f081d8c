use std::sync::Arc;

use validator::Validate;

use crate::database::AdminRepository;
use crate::dto::admin_dto::{AdminSummary, CreateAdminRequest, LoginRequest, LoginResponse};
use crate::error::{Error, Result};
use crate::models::admin::{AdminIdentity, AdminRole};
use crate::utils::{crypto, token};

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn AdminRepository>,
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl AdminService {
    pub fn new(repo: Arc<dyn AdminRepository>, jwt_secret: String, token_ttl_minutes: i64) -> Self {
        Self {
            repo,
            jwt_secret,
            token_ttl_minutes,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub async fn login(&self, payload: LoginRequest) -> Result<LoginResponse> {
        payload.validate()?;

        let Some(account) = self.repo.find_by_email(&payload.email).await? else {
            tracing::info!(email = %payload.email, "login for unknown admin");
            return Err(Error::Unauthorized(BAD_CREDENTIALS.into()));
        };
        if !crypto::verify_password(&payload.password, &account.password_hash) {
            tracing::info!(email = %account.email, "login with wrong password");
            return Err(Error::Unauthorized(BAD_CREDENTIALS.into()));
        }

        let token = token::issue_token(
            &self.jwt_secret,
            &account.email,
            account.role,
            self.token_ttl_minutes,
        )?;
        tracing::info!(email = %account.email, role = %account.role, "admin signed in");
        Ok(LoginResponse {
            token,
            admin: AdminIdentity::from(&account),
        })
    }

    pub async fn create_admin(&self, payload: CreateAdminRequest) -> Result<AdminSummary> {
        payload.validate()?;
        let email = normalize_email(&payload.email);
        let hash = crypto::hash_password(&payload.password)?;
        let account = self.repo.insert(&email, &hash, payload.role).await?;
        tracing::info!(email = %account.email, role = %account.role, "admin created");
        Ok(account.into())
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminSummary>> {
        let accounts = self.repo.list().await?;
        Ok(accounts.into_iter().map(Into::into).collect())
    }

    /// Seeds the first super admin so a fresh deployment can be signed into.
    /// An existing account with that email is left untouched.
    pub async fn ensure_bootstrap(&self, email: &str, password: &str) -> Result<()> {
        let email = normalize_email(email);
        let email = email.as_str();
        if self.repo.find_by_email(email).await?.is_some() {
            tracing::debug!(%email, "bootstrap admin already present");
            return Ok(());
        }
        let hash = crypto::hash_password(password)?;
        self.repo.insert(email, &hash, AdminRole::SuperAdmin).await?;
        tracing::info!(%email, "bootstrap super admin created");
        Ok(())
    }
}

/// Admin emails are stored lowercased; lookups compare case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
