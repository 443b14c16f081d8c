//! HTTP clients for the applicant form and the admin dashboard.

pub mod review;
pub mod session;
pub mod submission;

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::form::ErrorMap;

pub use review::ReviewClient;
pub use session::{AdminSessionStore, Session, SessionStorage};
pub use submission::SubmissionClient;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{} required field(s) are missing", .0.len())]
    Validation(ErrorMap),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Server { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("stored session is malformed: {0}")]
    MalformedSession(String),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

/// Uploads carry a recording of up to an hour, so the default is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `path` is relative, without a leading slash.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_under_a_base_path() {
        let api = ApiClient::new("https://hire.example.com/backend").unwrap();
        assert_eq!(
            api.endpoint("submit_application").unwrap().as_str(),
            "https://hire.example.com/backend/submit_application"
        );

        let root = ApiClient::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            root.endpoint("api/admin/login").unwrap().as_str(),
            "http://127.0.0.1:8080/api/admin/login"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Url(_))));
    }
}
