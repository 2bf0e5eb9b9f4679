//! Route definitions for the Fundline API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

// Auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
}

// Onboarding routes
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/api/clients/personal-info", put(submit_personal_info))
        .route("/api/clients/funding-details", put(submit_funding_details))
        .route("/api/clients/me", get(my_dashboard))
}

// Credit-report routes
pub fn credit_report_routes() -> Router<AppState> {
    Router::new().route("/api/credit-reports", post(submit_credit_report))
}

// Agreement routes
pub fn agreement_routes() -> Router<AppState> {
    Router::new().route("/api/agreements/sign", post(sign_agreement))
}

// Document routes
pub fn document_routes() -> Router<AppState> {
    Router::new().route("/api/documents/:id/download", get(download_document))
}

// Admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/clients", get(list_clients))
        .route("/api/admin/clients/:id", get(get_client))
        .route("/api/admin/clients/:id/decision", post(decide_client))
}
