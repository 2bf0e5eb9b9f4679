//! Credit-report credential submission.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{validation_message, AppError};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::services::credit_reports::CreditReportRequest;
use crate::state::AppState;

/// Receipt returned after a submission; the secret is never echoed.
#[derive(Debug, Serialize)]
pub struct CreditReportReceipt {
    pub id: Uuid,
    pub provider: String,
    pub submitted_at: DateTime<Utc>,
}

/// Store (or replace) the caller's credit-report credentials.
pub async fn submit_credit_report(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(req): Json<CreditReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreditReportReceipt>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let client = state
        .client_service
        .find_by_user_id(user.id)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("personal info must be completed first".to_string())
        })?;

    let report = state.credit_report_service.upsert(client.id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreditReportReceipt {
            id: report.id,
            provider: report.provider,
            submitted_at: report.submitted_at,
        })),
    ))
}
