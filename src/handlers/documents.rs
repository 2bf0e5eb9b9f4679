//! Document download: owner or admin only, bytes streamed from blob storage.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;

/// Download a stored document.
pub async fn download_document(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .document_service
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("document"))?;

    if !user.is_admin() {
        let client = state
            .client_service
            .find_by_id(document.client_id)
            .await?
            .ok_or(AppError::NotFound("client"))?;
        if client.user_id != user.id {
            return Err(AppError::Forbidden(
                "you do not have access to this document".to_string(),
            ));
        }
    }

    let bytes = state.blob_store.fetch(&document.storage_key).await?;

    let headers = [
        (header::CONTENT_TYPE, document.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            attachment_disposition(&document.file_name),
        ),
    ];

    Ok((headers, bytes))
}

/// `Content-Disposition` value for a download. Quotes and control characters
/// in the stored name are dropped so the header stays well-formed.
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_quotes_the_file_name() {
        assert_eq!(
            attachment_disposition("funding-agreement.pdf"),
            "attachment; filename=\"funding-agreement.pdf\""
        );
    }

    #[test]
    fn disposition_strips_quotes_and_control_chars() {
        assert_eq!(
            attachment_disposition("fund\"ing\n.pdf"),
            "attachment; filename=\"funding.pdf\""
        );
    }
}
