use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Claims carried by a bearer token. `sub` holds the email the credential
/// was issued for.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

/// Sign a token with the configured secret (HS256).
pub fn sign(security: &SecurityConfig, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
}

/// Verify a token and return its claims. `Validation::default()` checks
/// both the signature and `exp`.
pub fn verify(security: &SecurityConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
    Ok(data.claims)
}
