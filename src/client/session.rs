use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{read_json, ApiClient, ClientError};
use crate::dto::admin_dto::{LoginRequest, LoginResponse};
use crate::models::admin::{AdminIdentity, AdminRole};

/// Storage slot holding the signed-in admin.
pub const SESSION_KEY: &str = "admin";

/// The signed-in admin. `token` is the bearer grant for the admin API; the
/// password itself is never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: AdminRole,
    pub token: String,
}

impl Session {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            email: resp.admin.email,
            role: resp.admin.role,
            token: resp.token,
        }
    }
}

/// String key-value slots that outlive the process.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// One `<key>.json` file per slot inside `dir`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.values().remove(key);
        Ok(())
    }
}

/// Checks admin credentials. `Ok(None)` means they did not match.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginResponse>, ClientError>;
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginResponse>, ClientError> {
        let url = self.endpoint("api/admin/login")?;
        let resp = self
            .http()
            .post(url)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        // a malformed email is as wrong as a wrong password
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST
        ) {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }
}

/// Holds the signed-in admin in memory and mirrors it into `storage` under
/// [`SESSION_KEY`].
pub struct AdminSessionStore<S> {
    storage: S,
    current: Option<Session>,
}

impl<S: SessionStorage> AdminSessionStore<S> {
    /// Rehydrates a previous session. Unreadable or malformed data is removed
    /// and the store starts signed out.
    pub fn init(storage: S) -> Self {
        let current = match load(&storage) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored admin session");
                if let Err(e) = storage.remove(SESSION_KEY) {
                    tracing::warn!(error = %e, "failed to clear stored admin session");
                }
                None
            }
        };
        Self { storage, current }
    }

    /// `Ok(false)` when the credentials do not match; the previous state is
    /// kept. Transport failures are errors.
    pub async fn login<A>(&mut self, auth: &A, email: &str, password: &str) -> Result<bool, ClientError>
    where
        A: Authenticator + ?Sized,
    {
        let Some(resp) = auth.authenticate(email, password).await? else {
            tracing::info!(%email, "admin login rejected");
            return Ok(false);
        };

        let session = Session::from(resp);
        let raw = serde_json::to_string(&session)?;
        if let Err(e) = self.storage.set(SESSION_KEY, &raw) {
            tracing::warn!(error = %e, "admin session will not survive a restart");
        }
        tracing::info!(email = %session.email, role = %session.role, "admin signed in");
        self.current = Some(session);
        Ok(true)
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!(email = %session.email, "admin signed out");
        }
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::warn!(error = %e, "failed to clear stored admin session");
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Gate for dashboard screens; `NotAuthenticated` means "go to login".
    pub fn require_session(&self) -> Result<&Session, ClientError> {
        self.current.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn load<S: SessionStorage>(storage: &S) -> Result<Option<Session>, ClientError> {
    let Some(raw) = storage.get(SESSION_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| ClientError::MalformedSession(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(role: AdminRole) -> LoginResponse {
        LoginResponse {
            token: "jwt".into(),
            admin: AdminIdentity {
                email: "lead@whaot.example".into(),
                role,
            },
        }
    }

    #[tokio::test]
    async fn login_persists_and_init_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = MockAuthenticator::new();
        auth.expect_authenticate()
            .returning(|_, _| Ok(Some(response(AdminRole::SuperAdmin))));

        let mut store = AdminSessionStore::init(FileSessionStorage::new(dir.path()));
        assert!(!store.is_authenticated());
        assert!(store.login(&auth, "lead@whaot.example", "pw").await.unwrap());

        let reopened = AdminSessionStore::init(FileSessionStorage::new(dir.path()));
        let session = reopened.require_session().unwrap();
        assert_eq!(session.email, "lead@whaot.example");
        assert_eq!(session.role, AdminRole::SuperAdmin);
        assert_eq!(session.token, "jwt");
    }

    #[tokio::test]
    async fn wrong_credentials_return_false_and_keep_state() {
        let mut auth = MockAuthenticator::new();
        auth.expect_authenticate().returning(|_, _| Ok(None));

        let mut store = AdminSessionStore::init(MemorySessionStorage::new());
        assert!(!store.login(&auth, "lead@whaot.example", "bad").await.unwrap());
        assert!(store.current().is_none());
        assert_eq!(store.storage().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_session_is_removed_and_signed_out() {
        let mut storage = MockSessionStorage::new();
        storage
            .expect_get()
            .withf(|key| key.to_string() == SESSION_KEY)
            .returning(|_| Ok(Some("{not json".into())));
        storage
            .expect_remove()
            .withf(|key| key.to_string() == SESSION_KEY)
            .times(1)
            .returning(|_| Ok(()));

        let store = AdminSessionStore::init(storage);
        assert!(matches!(
            store.require_session(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let mut auth = MockAuthenticator::new();
        auth.expect_authenticate()
            .returning(|_, _| Ok(Some(response(AdminRole::Admin))));

        let mut store = AdminSessionStore::init(MemorySessionStorage::new());
        store.login(&auth, "lead@whaot.example", "pw").await.unwrap();
        assert!(store.storage().get(SESSION_KEY).unwrap().is_some());

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.storage().get(SESSION_KEY).unwrap(), None);
    }
}
