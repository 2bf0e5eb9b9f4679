//! Onboarding submissions and the client dashboard.

use axum::{extract::State, Json};
use serde::Serialize;
use validator::Validate;

use crate::error::{validation_message, AppError};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ApiResponse, Client, Document, DocumentKind};
use crate::services::clients::{FundingDetailsRequest, PersonalInfoRequest};
use crate::state::AppState;

/// Create or revise the caller's personal information.
pub async fn submit_personal_info(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(req): Json<PersonalInfoRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let client = state.client_service.upsert_personal_info(user.id, req).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// Record the caller's funding details. 409 until personal info exists.
pub async fn submit_funding_details(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(req): Json<FundingDetailsRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let client = state.client_service.submit_funding_details(user.id, req).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// Dashboard payload: the client record, derived step flags, and documents.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub client: Client,
    pub steps: OnboardingSteps,
    pub documents: Vec<Document>,
}

/// Which onboarding steps the client has completed.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OnboardingSteps {
    pub personal_info: bool,
    pub funding_details: bool,
    pub credit_report: bool,
    pub agreement: bool,
}

impl OnboardingSteps {
    pub fn derive(client: &Client, has_credit_report: bool, documents: &[Document]) -> Self {
        Self {
            personal_info: client.personal_info_completed_at.is_some(),
            funding_details: client.funding_details_completed_at.is_some(),
            credit_report: has_credit_report,
            agreement: documents
                .iter()
                .any(|d| d.kind == DocumentKind::FundingAgreement),
        }
    }
}

/// Status dashboard for the signed-in client. 404 until the first submission.
pub async fn my_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let client = state
        .client_service
        .find_by_user_id(user.id)
        .await?
        .ok_or(AppError::NotFound("client"))?;

    let documents = state.document_service.list_for_client(client.id).await?;
    let has_credit_report = state
        .credit_report_service
        .find_by_client(client.id)
        .await?
        .is_some();

    let steps = OnboardingSteps::derive(&client, has_credit_report, &documents);

    Ok(Json(ApiResponse::ok(DashboardResponse {
        client,
        steps,
        documents,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FundingStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn bare_client() -> Client {
        Client {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            phone: None,
            date_of_birth: None,
            ssn_last4: None,
            street_address: None,
            city: None,
            state: None,
            postal_code: None,
            personal_info_completed_at: None,
            employer: None,
            employment_status: None,
            annual_income_cents: None,
            requested_amount_cents: None,
            funding_purpose: None,
            funding_details_completed_at: None,
            funding_status: FundingStatus::Pending,
            decision_note: None,
            decided_by: None,
            decided_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn agreement_doc(client_id: Uuid) -> Document {
        Document {
            id: Uuid::new_v4(),
            client_id,
            kind: DocumentKind::FundingAgreement,
            file_name: "funding-agreement.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            storage_key: format!("clients/{client_id}/documents/x/funding-agreement.pdf"),
            byte_size: 1024,
            sha256: "00".repeat(32),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn steps_start_all_incomplete() {
        let client = bare_client();
        let steps = OnboardingSteps::derive(&client, false, &[]);
        assert_eq!(
            steps,
            OnboardingSteps {
                personal_info: false,
                funding_details: false,
                credit_report: false,
                agreement: false,
            }
        );
    }

    #[test]
    fn steps_follow_stamps_and_records() {
        let mut client = bare_client();
        client.personal_info_completed_at = Some(Utc::now());
        client.funding_details_completed_at = Some(Utc::now());
        let docs = vec![agreement_doc(client.id)];

        let steps = OnboardingSteps::derive(&client, true, &docs);
        assert_eq!(
            steps,
            OnboardingSteps {
                personal_info: true,
                funding_details: true,
                credit_report: true,
                agreement: true,
            }
        );
    }
}
