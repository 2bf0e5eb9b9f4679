//! Credit-report credential persistence. One row per client; the stored
//! credentials are an opaque blob this system never processes.

use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::CreditReport;

/// Credit-report service error
#[derive(Debug, thiserror::Error)]
pub enum CreditReportError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credit-report credential submission
#[derive(Debug, Deserialize, Validate)]
pub struct CreditReportRequest {
    #[validate(length(min = 1, message = "provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "login is required"))]
    pub report_login: String,
    #[validate(length(min = 1, message = "secret is required"))]
    pub report_secret: String,
}

/// Credit-report service
pub struct CreditReportService {
    pool: Arc<PgPool>,
}

impl CreditReportService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Store the credentials, replacing any earlier submission for the client.
    pub async fn upsert(
        &self,
        client_id: Uuid,
        req: CreditReportRequest,
    ) -> Result<CreditReport, CreditReportError> {
        let report = sqlx::query_as::<_, CreditReport>(
            r#"
            INSERT INTO credit_reports (client_id, provider, report_login, report_secret)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (client_id) DO UPDATE SET
                provider = EXCLUDED.provider,
                report_login = EXCLUDED.report_login,
                report_secret = EXCLUDED.report_secret,
                submitted_at = NOW(),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(req.provider.trim())
        .bind(req.report_login.trim())
        .bind(req.report_secret)
        .fetch_one(&*self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<CreditReport>, CreditReportError> {
        let report =
            sqlx::query_as::<_, CreditReport>("SELECT * FROM credit_reports WHERE client_id = $1")
                .bind(client_id)
                .fetch_optional(&*self.pool)
                .await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_never_serializes() {
        let report = CreditReport {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider: "equiscore".to_string(),
            report_login: "applicant-login".to_string(),
            report_secret: "p@ssw0rd-blob".to_string(),
            submitted_at: chrono::Utc::now(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&report).expect("report serializes");
        assert!(!json.contains("report_secret"));
        assert!(!json.contains("p@ssw0rd-blob"));
        assert!(json.contains("equiscore"), "provider stays visible");
    }

    #[test]
    fn submission_requires_all_fields() {
        let req = CreditReportRequest {
            provider: "equiscore".to_string(),
            report_login: "login".to_string(),
            report_secret: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
