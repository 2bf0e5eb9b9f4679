//! Credential store: password hashing and signed-token issuance/verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::models::{Claims, User};

/// Auth error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    TokenInvalid,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token signing failed: {0}")]
    Sign(jsonwebtoken::errors::Error),
}

/// Credential service: bcrypt password hashing plus HS256 token signing
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: &str, token_expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// Check a password against a stored hash. Mismatch and malformed hash both
    /// surface as `InvalidCredentials` so login responses stay uniform.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(_) => Err(AuthError::InvalidCredentials),
        }
    }

    /// Issue a bearer token for the user, expiring after the configured window.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        self.issue_token_at(user, iat, iat + self.token_expiry_hours * 3600)
    }

    fn issue_token_at(&self, user: &User, iat: i64, exp: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat,
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Sign)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use uuid::Uuid;

    // Minimum bcrypt cost keeps the hashing tests fast.
    fn service() -> AuthService {
        AuthService::new("test-secret", 24, 4)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "applicant@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Applicant".to_string(),
            role: UserRole::Client,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let auth = service();
        let hash = auth.hash_password("hunter2hunter2").expect("hashes");

        assert!(auth.verify_password("hunter2hunter2", &hash).is_ok());
        assert!(matches!(
            auth.verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn malformed_hash_reads_as_invalid_credentials() {
        let auth = service();
        assert!(matches!(
            auth.verify_password("anything", "not-a-bcrypt-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let auth = service();
        let user = user();
        let token = auth.issue_token(&user).expect("token issued");

        let claims = auth.decode_token(&token).expect("token decodes");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Client);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service();
        let user = user();
        let now = Utc::now().timestamp();
        let token = auth
            .issue_token_at(&user, now - 7200, now - 3600)
            .expect("token issued");

        assert!(matches!(
            auth.decode_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let auth = service();
        let other = AuthService::new("different-secret", 24, 4);
        let token = other.issue_token(&user()).expect("token issued");

        assert!(matches!(
            auth.decode_token(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.decode_token("not.a.token"),
            Err(AuthError::TokenInvalid)
        ));
    }
}
