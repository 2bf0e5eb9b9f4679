//! Document records: database pointers into blob storage, append-only.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Document, DocumentKind};

/// Document service error
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Document not found")]
    NotFound,
}

/// Document service
pub struct DocumentService {
    pool: Arc<PgPool>,
}

impl DocumentService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Record a stored blob. Size and checksum are computed from the bytes that
    /// were actually uploaded.
    pub async fn create(
        &self,
        client_id: Uuid,
        kind: DocumentKind,
        file_name: &str,
        content_type: &str,
        storage_key: &str,
        bytes: &[u8],
    ) -> Result<Document, DocumentError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                client_id, kind, file_name, content_type, storage_key, byte_size, sha256
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(kind)
        .bind(file_name)
        .bind(content_type)
        .bind(storage_key)
        .bind(bytes.len() as i64)
        .bind(sha256_hex(bytes))
        .fetch_one(&*self.pool)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentError> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(document)
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Document>, DocumentError> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(documents)
    }

    /// How many documents of a kind the client already has; drives the
    /// version suffix in generated file names.
    pub async fn count_for_client(
        &self,
        client_id: Uuid,
        kind: DocumentKind,
    ) -> Result<i64, DocumentError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE client_id = $1 AND kind = $2")
                .bind(client_id)
                .bind(kind)
                .fetch_one(&*self.pool)
                .await?;

        Ok(count)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// File name for the nth funding agreement: the first is unversioned, re-signs
/// get a version suffix.
pub fn agreement_file_name(existing_count: i64) -> String {
    if existing_count == 0 {
        "funding-agreement.pdf".to_string()
    } else {
        format!("funding-agreement-v{}.pdf", existing_count + 1)
    }
}

/// Storage key for a document blob, namespaced per client. The nonce keeps
/// re-signed agreements from colliding.
pub fn document_storage_key(client_id: Uuid, nonce: Uuid, file_name: &str) -> String {
    format!("clients/{client_id}/documents/{nonce}/{file_name}")
}
