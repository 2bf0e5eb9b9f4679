//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthService;
use crate::external::{AgreementRenderer, BlobStore, Mailer};
use crate::services::{ClientService, CreditReportService, DocumentService, UserService};

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub client_service: Arc<ClientService>,
    pub credit_report_service: Arc<CreditReportService>,
    pub document_service: Arc<DocumentService>,
    pub mailer: Arc<Mailer>,
    pub blob_store: Arc<BlobStore>,
    pub renderer: Arc<AgreementRenderer>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<AuthService>,
        user_service: Arc<UserService>,
        client_service: Arc<ClientService>,
        credit_report_service: Arc<CreditReportService>,
        document_service: Arc<DocumentService>,
        mailer: Arc<Mailer>,
        blob_store: Arc<BlobStore>,
        renderer: Arc<AgreementRenderer>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            client_service,
            credit_report_service,
            document_service,
            mailer,
            blob_store,
            renderer,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.user_service.clone()
    }
}

impl FromRef<AppState> for Arc<ClientService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.client_service.clone()
    }
}

impl FromRef<AppState> for Arc<CreditReportService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credit_report_service.clone()
    }
}

impl FromRef<AppState> for Arc<DocumentService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.document_service.clone()
    }
}

impl FromRef<AppState> for Arc<Mailer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for Arc<BlobStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.blob_store.clone()
    }
}

impl FromRef<AppState> for Arc<AgreementRenderer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.renderer.clone()
    }
}
