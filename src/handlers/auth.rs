//! Registration, login, and current-user handlers.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::{validation_message, AppError};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole};
use crate::state::AppState;

/// Register a new client account and sign them in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let password_hash = state.auth_service.hash_password(&req.password)?;
    let user = state
        .user_service
        .create_user(&req.email, &password_hash, &req.full_name, UserRole::Client)
        .await?;

    let token = state.auth_service.issue_token(&user)?;

    state
        .mailer
        .send_or_log(&user.email, "Welcome to Fundline", &welcome_email(&user.full_name))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse {
            token,
            user: user.into(),
        })),
    ))
}

/// Log in with email and password. Unknown email and wrong password produce
/// the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let user = state
        .user_service
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_string()))?;

    state
        .auth_service
        .verify_password(&req.password, &user.password_hash)?;

    let token = state.auth_service.issue_token(&user)?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// Return the authenticated account.
pub async fn me(
    AuthenticatedUser(user): AuthenticatedUser,
) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(user.into()))
}

fn welcome_email(full_name: &str) -> String {
    format!(
        "Hi {full_name},\n\n\
         Your Fundline account is ready. Sign in to continue your funding \
         application: complete your personal information, funding details, and \
         credit report, then sign your funding agreement.\n\n\
         The Fundline team"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_email_addresses_the_client() {
        let body = welcome_email("Ada Lovelace");
        assert!(body.starts_with("Hi Ada Lovelace,"));
        assert!(body.contains("funding"));
    }
}
