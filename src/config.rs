use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub public_rps: u32,
    pub uploads_dir: String,
    pub public_base_url: String,
    pub cors_origin: Option<String>,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub max_upload_mb: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            jwt_secret: get_env("JWT_SECRET")?,
            token_ttl_minutes: get_env_parse_or("TOKEN_TTL_MINUTES", 8 * 60)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 20)?,
            uploads_dir: get_env_or("UPLOADS_DIR", "./uploads"),
            public_base_url: get_env_or("PUBLIC_BASE_URL", "http://localhost:8080"),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
            max_upload_mb: get_env_parse_or("MAX_UPLOAD_MB", 512)?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_default_when_unset() {
        let value: u32 = get_env_parse_or("TR_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        env::set_var("TR_TEST_BAD_NUMBER", "not-a-number");
        let err = get_env_parse_or::<u32>("TR_TEST_BAD_NUMBER", 1).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
