use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::admin::AdminRole;

/// Bearer token payload. `sub` is the admin's email and doubles as the
/// reviewer identity stamped onto status changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: AdminRole,
}

pub fn issue_token(secret: &str, email: &str, role: AdminRole, ttl_minutes: i64) -> Result<String> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp().max(0) as usize;
    let claims = Claims {
        sub: email.to_string(),
        exp,
        role,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid_token".into()))
}
