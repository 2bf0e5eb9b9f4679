//! PDF render service wrapper: agreement fields plus the captured signature
//! image go out, the rendered funding-agreement PDF comes back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ExternalError;
use crate::models::{Client, User};

const SERVICE: &str = "renderer";

/// Everything the render template needs for one funding agreement.
#[derive(Debug, Serialize)]
pub struct AgreementData {
    pub client_id: Uuid,
    pub client_name: String,
    pub email: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub employer: String,
    pub annual_income_cents: i64,
    pub requested_amount_cents: i64,
    pub funding_purpose: String,
    pub signed_at: DateTime<Utc>,
    /// Captured signature, base64-encoded PNG
    pub signature_png: String,
}

impl AgreementData {
    /// Assemble the render payload. Callers have already enforced that both
    /// onboarding steps are complete, so missing optionals render blank rather
    /// than failing the signing.
    pub fn from_parts(
        user: &User,
        client: &Client,
        signature_png: String,
        signed_at: DateTime<Utc>,
    ) -> Self {
        let client_name = match (&client.first_name, &client.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => user.full_name.clone(),
        };

        Self {
            client_id: client.id,
            client_name,
            email: user.email.clone(),
            street_address: client.street_address.clone().unwrap_or_default(),
            city: client.city.clone().unwrap_or_default(),
            state: client.state.clone().unwrap_or_default(),
            postal_code: client.postal_code.clone().unwrap_or_default(),
            employer: client.employer.clone().unwrap_or_default(),
            annual_income_cents: client.annual_income_cents.unwrap_or_default(),
            requested_amount_cents: client.requested_amount_cents.unwrap_or_default(),
            funding_purpose: client.funding_purpose.clone().unwrap_or_default(),
            signed_at,
            signature_png,
        }
    }
}

pub struct AgreementRenderer {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AgreementRenderer {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Render the agreement and return the PDF bytes.
    pub async fn render(&self, data: &AgreementData) -> Result<Vec<u8>, ExternalError> {
        let mut request = self
            .http
            .post(format!("{}/render/funding-agreement", self.base_url))
            .json(data);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(ExternalError::http(SERVICE))?;
        let response = ExternalError::check_status(SERVICE, response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(ExternalError::http(SERVICE))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FundingStatus, UserRole};

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "applicant@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Account Holder".to_string(),
            role: UserRole::Client,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn client(user_id: Uuid) -> Client {
        Client {
            id: Uuid::new_v4(),
            user_id,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            phone: Some("5550100200".to_string()),
            date_of_birth: None,
            ssn_last4: Some("1234".to_string()),
            street_address: Some("1 Main St".to_string()),
            city: Some("Des Moines".to_string()),
            state: Some("IA".to_string()),
            postal_code: Some("50309".to_string()),
            personal_info_completed_at: Some(Utc::now()),
            employer: Some("Acme".to_string()),
            employment_status: Some("full_time".to_string()),
            annual_income_cents: Some(7_500_000),
            requested_amount_cents: Some(2_000_000),
            funding_purpose: Some("equipment".to_string()),
            funding_details_completed_at: Some(Utc::now()),
            funding_status: FundingStatus::Pending,
            decision_note: None,
            decided_by: None,
            decided_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn payload_prefers_client_legal_name() {
        let user = user();
        let client = client(user.id);
        let data = AgreementData::from_parts(&user, &client, "c2ln".to_string(), Utc::now());

        assert_eq!(data.client_name, "Ada Lovelace");
        assert_eq!(data.requested_amount_cents, 2_000_000);
        assert_eq!(data.signature_png, "c2ln");
    }

    #[test]
    fn payload_falls_back_to_account_name() {
        let user = user();
        let mut client = client(user.id);
        client.first_name = None;

        let data = AgreementData::from_parts(&user, &client, "c2ln".to_string(), Utc::now());
        assert_eq!(data.client_name, "Account Holder");
    }

    #[test]
    fn payload_serializes_signature_and_amounts() {
        let user = user();
        let client = client(user.id);
        let data = AgreementData::from_parts(&user, &client, "c2lnbmF0dXJl".to_string(), Utc::now());

        let json = serde_json::to_value(&data).expect("payload serializes");
        assert_eq!(json["signature_png"], "c2lnbmF0dXJl");
        assert_eq!(json["requested_amount_cents"], 2_000_000);
        assert_eq!(json["email"], "applicant@example.com");
    }
}
