//! Authentication service: password hashing, JWT issuance, and login.
//!
//! Deliberately small. There is no refresh flow, no lockout counter, and no
//! rate limiting — the bearer token is the whole session and its expiry ends
//! it. The seed tool provisions accounts; the API never creates them.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

/// JWT claims embedded in access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
}

/// Bearer token returned on successful login.
#[derive(Debug, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a signed access token for an authenticated user.
pub fn generate_token(
    user: &User,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthToken, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(AuthToken {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Authenticate a user by email and password, returning a bearer token.
///
/// Every failure mode (unknown email, wrong password, deactivated account)
/// collapses into the same `InvalidCredentials` error so the login form has
/// exactly one inline message to show.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthToken, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await?;

    generate_token(&user, jwt_secret, expiry_secs)
}

/// Find a user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            display_name: "Admin".to_string(),
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_and_verify() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn token_generation_and_validation() {
        let user = sample_user();
        let secret = "test-secret-key-for-jwt";

        let token = generate_token(&user, secret, 900).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 900);

        let claims = validate_token(&token.access_token, secret).unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.user_id, user.id.to_string());
    }

    #[test]
    fn invalid_token_rejected() {
        let result = validate_token("garbage.token.here", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let user = sample_user();
        let secret = "test-secret";
        // Generate token that expired well beyond the 60s leeway window
        let token = generate_token(&user, secret, -3600).unwrap();
        let result = validate_token(&token.access_token, secret);
        assert!(result.is_err());
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let user = sample_user();
        let token = generate_token(&user, "secret-a", 900).unwrap();
        let result = validate_token(&token.access_token, "secret-b");
        assert!(result.is_err());
    }
}
