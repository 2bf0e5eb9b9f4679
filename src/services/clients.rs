//! Client (loan applicant) persistence: onboarding steps and admin decisions.
//!
//! The onboarding submissions never touch `funding_status`; the decision path
//! is its only writer and enforces the legal transitions.

use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Client, ClientWithOwner, FundingStatus};

/// Client service error
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Client not found")]
    NotFound,
    #[error("{0} step not completed")]
    StepIncomplete(&'static str),
    #[error("Illegal funding status transition")]
    IllegalTransition {
        from: FundingStatus,
        to: FundingStatus,
    },
}

/// Personal-info submission
#[derive(Debug, Deserialize, Validate)]
pub struct PersonalInfoRequest {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 7, message = "phone number is too short"))]
    pub phone: String,
    pub date_of_birth: chrono::NaiveDate,
    #[validate(length(equal = 4, message = "provide the last four digits of the SSN"))]
    pub ssn_last4: String,
    #[validate(length(min = 1, message = "street address is required"))]
    pub street_address: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 2, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 3, message = "postal code is required"))]
    pub postal_code: String,
}

/// Funding-details submission
#[derive(Debug, Deserialize, Validate)]
pub struct FundingDetailsRequest {
    #[validate(length(min = 1, message = "employer is required"))]
    pub employer: String,
    #[validate(length(min = 1, message = "employment status is required"))]
    pub employment_status: String,
    #[validate(range(min = 0, message = "annual income cannot be negative"))]
    pub annual_income_cents: i64,
    #[validate(range(min = 1, message = "requested amount must be positive"))]
    pub requested_amount_cents: i64,
    #[validate(length(min = 1, message = "funding purpose is required"))]
    pub funding_purpose: String,
}

/// Admin decision payload
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: DecisionAction,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
    Fund,
}

impl DecisionAction {
    pub fn target_status(self) -> FundingStatus {
        match self {
            DecisionAction::Approve => FundingStatus::Approved,
            DecisionAction::Reject => FundingStatus::Rejected,
            DecisionAction::Fund => FundingStatus::Funded,
        }
    }
}

/// Client service
pub struct ClientService {
    pool: Arc<PgPool>,
}

impl ClientService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create or update the caller's client row with personal info. The first
    /// submission creates the row and stamps the step; later submissions only
    /// revise the fields.
    pub async fn upsert_personal_info(
        &self,
        user_id: Uuid,
        req: PersonalInfoRequest,
    ) -> Result<Client, ClientError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                user_id, first_name, last_name, phone, date_of_birth, ssn_last4,
                street_address, city, state, postal_code, personal_info_completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                date_of_birth = EXCLUDED.date_of_birth,
                ssn_last4 = EXCLUDED.ssn_last4,
                street_address = EXCLUDED.street_address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                postal_code = EXCLUDED.postal_code,
                personal_info_completed_at =
                    COALESCE(clients.personal_info_completed_at, NOW()),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(req.first_name.trim())
        .bind(req.last_name.trim())
        .bind(req.phone.trim())
        .bind(req.date_of_birth)
        .bind(req.ssn_last4.trim())
        .bind(req.street_address.trim())
        .bind(req.city.trim())
        .bind(req.state.trim())
        .bind(req.postal_code.trim())
        .fetch_one(&*self.pool)
        .await?;

        Ok(client)
    }

    /// Record the funding-details step. Requires personal info first.
    pub async fn submit_funding_details(
        &self,
        user_id: Uuid,
        req: FundingDetailsRequest,
    ) -> Result<Client, ClientError> {
        let existing = self.find_by_user_id(user_id).await?;
        match existing {
            Some(client) if client.personal_info_completed_at.is_some() => {}
            _ => return Err(ClientError::StepIncomplete("personal info")),
        }

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                employer = $2,
                employment_status = $3,
                annual_income_cents = $4,
                requested_amount_cents = $5,
                funding_purpose = $6,
                funding_details_completed_at =
                    COALESCE(funding_details_completed_at, NOW()),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(req.employer.trim())
        .bind(req.employment_status.trim())
        .bind(req.annual_income_cents)
        .bind(req.requested_amount_cents)
        .bind(req.funding_purpose.trim())
        .fetch_one(&*self.pool)
        .await?;

        Ok(client)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Client>, ClientError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(client)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ClientError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(client)
    }

    /// Admin listing with an optional status filter, newest first.
    pub async fn list_with_owner(
        &self,
        status: Option<FundingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ClientWithOwner>, i64), ClientError> {
        const COLUMNS: &str = r#"
            SELECT c.id, c.user_id, u.email, u.full_name,
                   c.first_name, c.last_name, c.requested_amount_cents,
                   c.funding_status, c.personal_info_completed_at,
                   c.funding_details_completed_at, c.created_at, c.updated_at
            FROM clients c
            JOIN users u ON u.id = c.user_id
        "#;

        let (rows, total) = match status {
            Some(status) => {
                let rows = sqlx::query_as::<_, ClientWithOwner>(&format!(
                    "{COLUMNS} WHERE c.funding_status = $1 \
                     ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&*self.pool)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE funding_status = $1")
                        .bind(status)
                        .fetch_one(&*self.pool)
                        .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, ClientWithOwner>(&format!(
                    "{COLUMNS} ORDER BY c.created_at DESC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&*self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
                    .fetch_one(&*self.pool)
                    .await?;

                (rows, total)
            }
        };

        Ok((rows, total))
    }

    /// Apply an admin decision. The only code path that writes `funding_status`.
    pub async fn decide(
        &self,
        client_id: Uuid,
        action: DecisionAction,
        note: Option<&str>,
        decided_by: Uuid,
    ) -> Result<Client, ClientError> {
        let client = self
            .find_by_id(client_id)
            .await?
            .ok_or(ClientError::NotFound)?;

        let target = action.target_status();
        if !client.funding_status.can_transition_to(target) {
            return Err(ClientError::IllegalTransition {
                from: client.funding_status,
                to: target,
            });
        }

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                funding_status = $2,
                decision_note = $3,
                decided_by = $4,
                decided_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(target)
        .bind(note)
        .bind(decided_by)
        .fetch_one(&*self.pool)
        .await?;

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_actions_map_to_statuses() {
        assert_eq!(
            DecisionAction::Approve.target_status(),
            FundingStatus::Approved
        );
        assert_eq!(
            DecisionAction::Reject.target_status(),
            FundingStatus::Rejected
        );
        assert_eq!(DecisionAction::Fund.target_status(), FundingStatus::Funded);
    }

    #[test]
    fn decision_payload_parses_lowercase_actions() {
        let req: DecisionRequest =
            serde_json::from_str(r#"{"decision": "approve", "note": "looks good"}"#)
                .expect("decision parses");
        assert_eq!(req.decision, DecisionAction::Approve);
        assert_eq!(req.note.as_deref(), Some("looks good"));

        let req: DecisionRequest =
            serde_json::from_str(r#"{"decision": "fund"}"#).expect("decision parses");
        assert_eq!(req.decision, DecisionAction::Fund);
        assert!(req.note.is_none());

        assert!(serde_json::from_str::<DecisionRequest>(r#"{"decision": "escalate"}"#).is_err());
    }

    #[test]
    fn personal_info_validation_catches_bad_fields() {
        let req = PersonalInfoRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "5550100200".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
            ssn_last4: "1234".to_string(),
            street_address: "1 Main St".to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            postal_code: "50309".to_string(),
        };
        assert!(req.validate().is_ok());

        let bad = PersonalInfoRequest {
            ssn_last4: "12345".to_string(),
            ..req
        };
        assert!(bad.validate().is_err(), "five SSN digits should fail");
    }

    #[test]
    fn funding_details_validation_bounds_amounts() {
        let req = FundingDetailsRequest {
            employer: "Acme".to_string(),
            employment_status: "full_time".to_string(),
            annual_income_cents: 7_500_000,
            requested_amount_cents: 2_000_000,
            funding_purpose: "equipment".to_string(),
        };
        assert!(req.validate().is_ok());

        let negative_income = FundingDetailsRequest {
            annual_income_cents: -1,
            employer: "Acme".to_string(),
            employment_status: "full_time".to_string(),
            requested_amount_cents: 2_000_000,
            funding_purpose: "equipment".to_string(),
        };
        assert!(negative_income.validate().is_err());

        let zero_request = FundingDetailsRequest {
            annual_income_cents: 7_500_000,
            employer: "Acme".to_string(),
            employment_status: "full_time".to_string(),
            requested_amount_cents: 0,
            funding_purpose: "equipment".to_string(),
        };
        assert!(zero_request.validate().is_err());
    }
}
