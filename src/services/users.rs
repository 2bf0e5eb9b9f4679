//! User account persistence.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{User, UserRole};

/// User service error
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User not found")]
    NotFound,
}

/// User service
pub struct UserService {
    pool: Arc<PgPool>,
}

impl UserService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a user account. Emails are stored lowercased so lookups are
    /// case-insensitive.
    ///
    /// # Errors
    /// Returns `DuplicateEmail` when the address is already registered.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, UserError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, role, created_at, updated_at
            "#,
        )
        .bind(email.trim().to_lowercase())
        .bind(password_hash)
        .bind(full_name.trim())
        .bind(role)
        .fetch_one(&*self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db))
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Err(UserError::DuplicateEmail)
            }
            Err(e) => Err(UserError::Database(e)),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&*self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(user)
    }
}
