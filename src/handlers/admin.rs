//! Admin console endpoints: review queue, client detail, funding decisions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AdminUser;
use crate::models::{
    ApiResponse, Client, ClientWithOwner, Document, FundingStatus, PaginatedResponse,
    PaginationParams, UserResponse,
};
use crate::services::clients::{DecisionAction, DecisionRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminClientsQuery {
    pub status: Option<FundingStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Paginated review queue, optionally filtered by funding status.
pub async fn list_clients(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<AdminClientsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<ClientWithOwner>>>, AppError> {
    let params = PaginationParams {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = params.resolve();

    let (rows, total) = state
        .client_service
        .list_with_owner(query.status, limit, params.offset())
        .await?;

    Ok(Json(ApiResponse::ok(PaginatedResponse {
        data: rows,
        total,
        page,
        limit,
    })))
}

/// Summary of a stored credit report; the credentials stay write-only.
#[derive(Debug, Serialize)]
pub struct CreditReportSummary {
    pub provider: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminClientDetail {
    pub client: Client,
    pub owner: UserResponse,
    pub documents: Vec<Document>,
    pub credit_report: Option<CreditReportSummary>,
}

/// Full detail view for one submission.
pub async fn get_client(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminClientDetail>>, AppError> {
    let client = state
        .client_service
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("client"))?;

    let owner = state
        .user_service
        .find_by_id(client.user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let documents = state.document_service.list_for_client(client.id).await?;
    let credit_report = state
        .credit_report_service
        .find_by_client(client.id)
        .await?
        .map(|report| CreditReportSummary {
            provider: report.provider,
            submitted_at: report.submitted_at,
        });

    Ok(Json(ApiResponse::ok(AdminClientDetail {
        client,
        owner: owner.into(),
        documents,
        credit_report,
    })))
}

/// Apply a funding decision and notify the client.
pub async fn decide_client(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let client = state
        .client_service
        .decide(id, req.decision, req.note.as_deref(), admin.id)
        .await?;

    if let Some(owner) = state.user_service.find_by_id(client.user_id).await? {
        let (subject, body) = decision_email(&owner.full_name, req.decision, req.note.as_deref());
        state.mailer.send_or_log(&owner.email, &subject, &body).await;
    }

    Ok(Json(ApiResponse::ok(client)))
}

fn decision_email(
    full_name: &str,
    decision: DecisionAction,
    note: Option<&str>,
) -> (String, String) {
    let (subject, outcome) = match decision {
        DecisionAction::Approve => (
            "Your funding application was approved",
            "your application has been approved. We will be in touch about disbursement.",
        ),
        DecisionAction::Reject => (
            "An update on your funding application",
            "we are unable to approve your application at this time.",
        ),
        DecisionAction::Fund => (
            "Your funding has been disbursed",
            "your funding has been disbursed. Check your dashboard for details.",
        ),
    };

    let mut body = format!("Hi {full_name},\n\nAfter review, {outcome}");
    if let Some(note) = note {
        body.push_str(&format!("\n\nReviewer note: {note}"));
    }
    body.push_str("\n\nThe Fundline team");

    (subject.to_string(), body)
}
