//! Data models for the Fundline backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// User account model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Admin,
}

/// Client (loan applicant) model, owned by a User account
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Client {
    pub id: Uuid,
    pub user_id: Uuid,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub ssn_last4: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub personal_info_completed_at: Option<DateTime<Utc>>,

    pub employer: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income_cents: Option<i64>,
    pub requested_amount_cents: Option<i64>,
    pub funding_purpose: Option<String>,
    pub funding_details_completed_at: Option<DateTime<Utc>>,

    pub funding_status: FundingStatus,
    pub decision_note: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Funding status, set only by an admin decision
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "funding_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FundingStatus {
    Pending,
    Approved,
    Rejected,
    Funded,
}

impl FundingStatus {
    /// Legal decision transitions. Rejected and funded are terminal.
    pub fn can_transition_to(self, next: FundingStatus) -> bool {
        matches!(
            (self, next),
            (FundingStatus::Pending, FundingStatus::Approved)
                | (FundingStatus::Pending, FundingStatus::Rejected)
                | (FundingStatus::Approved, FundingStatus::Funded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FundingStatus::Pending => "pending",
            FundingStatus::Approved => "approved",
            FundingStatus::Rejected => "rejected",
            FundingStatus::Funded => "funded",
        }
    }
}

/// Stored third-party credit-report credentials. Opaque to the system;
/// the secret is write-only.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct CreditReport {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider: String,
    pub report_login: String,
    #[serde(skip_serializing)]
    pub report_secret: String,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generated document stored in blob storage, pointed at by this record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Document {
    pub id: Uuid,
    pub client_id: Uuid,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub storage_key: String,
    pub byte_size: i64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

/// Document kinds
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "document_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    FundingAgreement,
}

/// Client row joined with its owning account, for admin listings
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ClientWithOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub requested_amount_cents: Option<i64>,
    pub funding_status: FundingStatus,
    pub personal_info_completed_at: Option<DateTime<Utc>>,
    pub funding_details_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Clamp to sane bounds: page >= 1, 1 <= limit <= 100 (default 20).
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        (page, limit)
    }

    pub fn offset(&self) -> i64 {
        let (page, limit) = self.resolve();
        (page - 1) * limit
    }
}

/// Paginated response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funding_status_transitions() {
        use FundingStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Funded));

        assert!(!Pending.can_transition_to(Funded), "funding skips approval");
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved), "rejected is terminal");
        assert!(!Funded.can_transition_to(Approved), "funded is terminal");
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.resolve(), (1, 20));
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(params.resolve(), (3, 100));
        assert_eq!(params.offset(), 200);

        let params = PaginationParams {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(params.resolve(), (1, 1));
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            email: "client@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            full_name: "Test Client".to_string(),
            role: UserRole::Client,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).expect("user serializes");
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }
}
