//! Authorization gate: extractors that decode the bearer token, check expiry
//! and role, and attach the resolved user to the request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Any signed-in user. Rejects with 401 when the token is missing, malformed,
/// expired, or points at an account that no longer exists.
pub struct AuthenticatedUser(pub User);

/// Signed-in user with the admin role; 403 otherwise.
pub struct AdminUser(pub User);

/// The user when a valid token is present, `None` otherwise. Never rejects.
pub struct OptionalUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.auth_service.decode_token(bearer.token())?;

        let user = state
            .user_service
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

        Ok(AuthenticatedUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }

        Ok(AdminUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state)
            .await
            .ok()
            .map(|authenticated| authenticated.0);

        Ok(OptionalUser(user))
    }
}
