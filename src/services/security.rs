use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::models::account::{self, AccountRole};

/// Bytes of entropy in an invite code (hex encoded to 32 characters)
pub const INVITE_CODE_BYTES: usize = 16;

const SESSION_ISSUER: &str = "partner-portal";

static SIGNING_SECRET: Lazy<Vec<u8>> = Lazy::new(|| match &CONFIG.auth.jwt_secret {
    Some(secret) => secret.as_bytes().to_vec(),
    None => {
        tracing::warn!(
            "PORTAL_JWT_SECRET not set, using an ephemeral signing secret; sessions end on restart"
        );
        let mut bytes = vec![0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        bytes
    }
});

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Account id
    pub iss: String,
    pub email: String,
    pub role: AccountRole,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create a signed session token for an account
pub fn create_session_token(account: &account::Model, expires_in: Option<i64>) -> Result<String> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expires_in.unwrap_or(CONFIG.auth.session_ttl_secs));

    let claims = Claims {
        sub: account.id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        email: account.email.clone(),
        role: account.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(&SIGNING_SECRET);
    encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| e.into())
}

/// Decode and validate a session token
pub fn decode_token(token: &str) -> Result<Claims> {
    let key = DecodingKey::from_secret(&SIGNING_SECRET);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Generate a cryptographically secure random string: `byte_len` random
/// bytes, hex encoded
pub fn generate_random_string(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a single-use invite code
pub fn generate_invite_code() -> String {
    generate_random_string(INVITE_CODE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account(role: AccountRole) -> account::Model {
        let now = Utc::now();
        account::Model {
            id: 42,
            email: "jo@example.com".to_string(),
            name: "Jo".to_string(),
            company_name: None,
            hashed_password: String::new(),
            role,
            is_active: true,
            application_id: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(code, generate_invite_code());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_session_token_roundtrip() {
        let token = create_session_token(&sample_account(AccountRole::Partner), None).unwrap();
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.role, AccountRole::Partner);
    }

    #[test]
    fn test_expired_session_token_rejected() {
        let token = create_session_token(&sample_account(AccountRole::Admin), Some(-60)).unwrap();
        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = create_session_token(&sample_account(AccountRole::Partner), None).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(decode_token(&tampered).is_err());
    }
}
