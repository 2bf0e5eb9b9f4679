//! Authentication payloads and token claims

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use super::{User, UserRole};

/// JWT claims carried by every bearer token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token plus the public view of the account
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public view of a user account
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let ok = RegisterRequest {
            email: "applicant@example.com".to_string(),
            password: "longenough".to_string(),
            full_name: "Applicant".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-address".to_string(),
            password: "longenough".to_string(),
            full_name: "Applicant".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "applicant@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Applicant".to_string(),
        };
        assert!(short_password.validate().is_err());

        let no_name = RegisterRequest {
            email: "applicant@example.com".to_string(),
            password: "longenough".to_string(),
            full_name: String::new(),
        };
        assert!(no_name.validate().is_err());
    }
}
