use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::admin::{AdminAccount, AdminIdentity, AdminRole};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminIdentity,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSummary {
    pub id: uuid::Uuid,
    pub email: String,
    pub role: AdminRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AdminAccount> for AdminSummary {
    fn from(account: AdminAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}
