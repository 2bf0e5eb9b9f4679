//! Funding-agreement signing: render the PDF, store it, record the pointer.

use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::external::AgreementData;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ApiResponse, Document, DocumentKind};
use crate::services::documents::{agreement_file_name, document_storage_key};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignAgreementRequest {
    /// Captured signature as a base64 PNG, with or without a data-URL prefix.
    pub signature_png: String,
}

/// Sign the funding agreement. Requires both onboarding steps; each signing
/// appends a new document version.
pub async fn sign_agreement(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(req): Json<SignAgreementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), AppError> {
    let signature_png = normalize_signature(&req.signature_png)?;

    let client = state
        .client_service
        .find_by_user_id(user.id)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("personal info must be completed first".to_string())
        })?;
    if client.personal_info_completed_at.is_none() {
        return Err(AppError::Conflict(
            "personal info must be completed first".to_string(),
        ));
    }
    if client.funding_details_completed_at.is_none() {
        return Err(AppError::Conflict(
            "funding details must be completed first".to_string(),
        ));
    }

    let signed_at = Utc::now();
    let agreement = AgreementData::from_parts(&user, &client, signature_png, signed_at);
    let pdf = state.renderer.render(&agreement).await?;

    let existing = state
        .document_service
        .count_for_client(client.id, DocumentKind::FundingAgreement)
        .await?;
    let file_name = agreement_file_name(existing);
    let storage_key = document_storage_key(client.id, Uuid::new_v4(), &file_name);

    state
        .blob_store
        .put(&storage_key, pdf.clone(), "application/pdf")
        .await?;

    let document = state
        .document_service
        .create(
            client.id,
            DocumentKind::FundingAgreement,
            &file_name,
            "application/pdf",
            &storage_key,
            &pdf,
        )
        .await?;

    state
        .mailer
        .send_or_log(
            &user.email,
            "Your signed funding agreement",
            &signed_email(&user.full_name, &file_name),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(document))))
}

/// Strip an optional data-URL prefix and confirm the payload is non-empty
/// base64. Returns the bare base64 string passed on to the renderer.
fn normalize_signature(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let encoded = trimmed
        .strip_prefix("data:image/png;base64,")
        .unwrap_or(trimmed);

    let bytes = BASE64.decode(encoded).map_err(|_| {
        AppError::Validation("signature must be a base64-encoded PNG".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("signature image is empty".to_string()));
    }

    Ok(encoded.to_string())
}

fn signed_email(full_name: &str, file_name: &str) -> String {
    format!(
        "Hi {full_name},\n\n\
         Your funding agreement has been signed and saved as {file_name}. You \
         can download it any time from your dashboard. Our team will review \
         your application and follow up with a decision.\n\n\
         The Fundline team"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64 of a short PNG-ish payload
    const SIGNATURE: &str = "iVBORw0KGgo=";

    #[test]
    fn bare_base64_passes_through() {
        let normalized = normalize_signature(SIGNATURE).expect("valid signature");
        assert_eq!(normalized, SIGNATURE);
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let raw = format!("data:image/png;base64,{SIGNATURE}");
        let normalized = normalize_signature(&raw).expect("valid signature");
        assert_eq!(normalized, SIGNATURE);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let raw = format!("  {SIGNATURE}\n");
        assert_eq!(normalize_signature(&raw).expect("valid"), SIGNATURE);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = normalize_signature("not base64 at all!").expect_err("must fail");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_signature_is_rejected() {
        assert!(matches!(
            normalize_signature(""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            normalize_signature("data:image/png;base64,"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn signed_email_names_the_file() {
        let body = signed_email("Ada Lovelace", "funding-agreement-v2.pdf");
        assert!(body.contains("funding-agreement-v2.pdf"));
        assert!(body.starts_with("Hi Ada Lovelace,"));
    }
}
