use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::admin::{AdminAccount, AdminRole};

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Fails with `Error::Conflict` when the email is already registered.
    async fn insert(&self, email: &str, password_hash: &str, role: AdminRole)
        -> Result<AdminAccount>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>>;

    async fn list(&self) -> Result<Vec<AdminAccount>>;
}

#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminAccount> {
        let res = sqlx::query_as::<_, AdminAccount>(
            r#"
            INSERT INTO admins (id, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Conflict(
                format!("An admin with email {} already exists", email),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let account = sqlx::query_as::<_, AdminAccount>(
            r#"SELECT id, email, password_hash, role, created_at FROM admins WHERE lower(email) = lower($1)"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<AdminAccount>> {
        let accounts = sqlx::query_as::<_, AdminAccount>(
            r#"SELECT id, email, password_hash, role, created_at FROM admins ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }
}
