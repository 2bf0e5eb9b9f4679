//! Central request error type and its HTTP mapping.
//!
//! Service-level errors convert into `AppError`, and `AppError` renders as the
//! standard `ApiResponse` envelope. Database and upstream failures log their
//! detail and return a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::external::ExternalError;
use crate::models::ApiResponse;
use crate::services::clients::ClientError;
use crate::services::credit_reports::CreditReportError;
use crate::services::documents::DocumentError;
use crate::services::users::UserError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("upstream service error")]
    Upstream(#[from] ExternalError),

    #[error("internal error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Database(err) => tracing::error!(error = %err, "database error"),
            AppError::Upstream(err) => tracing::error!(error = %err, "upstream service error"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        (status, Json(ApiResponse::<()>::err(self.to_string()))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("invalid email or password".to_string())
            }
            AuthError::TokenExpired => AppError::Unauthorized("token expired".to_string()),
            AuthError::TokenInvalid => AppError::Unauthorized("invalid token".to_string()),
            AuthError::Hash(_) | AuthError::Sign(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail => {
                AppError::Conflict("an account with this email already exists".to_string())
            }
            UserError::NotFound => AppError::NotFound("user"),
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound => AppError::NotFound("client"),
            ClientError::StepIncomplete(step) => {
                AppError::Conflict(format!("{step} must be completed first"))
            }
            ClientError::IllegalTransition { from, to } => AppError::Conflict(format!(
                "cannot move funding status from {} to {}",
                from.as_str(),
                to.as_str()
            )),
            ClientError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreditReportError> for AppError {
    fn from(err: CreditReportError) -> Self {
        match err {
            CreditReportError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound => AppError::NotFound("document"),
            DocumentError::Database(e) => AppError::Database(e),
        }
    }
}

/// Collapse a `validator` failure into a single message, one line per offending field.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field}: {detail}")
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("no".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("client").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        let err: AppError = AuthError::TokenExpired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: AppError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "invalid email or password");
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let err: AppError = UserError::DuplicateEmail.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
