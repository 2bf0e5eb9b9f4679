//! Fundline Backend Server
//!
//! Main entry point for the Fundline onboarding backend: client registration,
//! onboarding submissions, funding-agreement signing, and the admin review
//! console.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fundline_server::auth::AuthService;
use fundline_server::config::Config;
use fundline_server::external::{AgreementRenderer, BlobStore, Mailer};
use fundline_server::middleware::auth::OptionalUser;
use fundline_server::models::ApiResponse;
use fundline_server::routes;
use fundline_server::services::{ClientService, CreditReportService, DocumentService, UserService};
use fundline_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Database connected successfully");
    let pool = Arc::new(db_pool);

    // Credential store and persistence services
    let auth_service = Arc::new(AuthService::new(
        &config.jwt_secret,
        config.token_expiry_hours,
        config.bcrypt_cost,
    ));
    let user_service = Arc::new(UserService::new(pool.clone()));
    let client_service = Arc::new(ClientService::new(pool.clone()));
    let credit_report_service = Arc::new(CreditReportService::new(pool.clone()));
    let document_service = Arc::new(DocumentService::new(pool.clone()));

    // External collaborators share one HTTP client
    let http = reqwest::Client::new();
    let mailer = Arc::new(Mailer::new(
        http.clone(),
        &config.mail_api_url,
        config.mail_api_key.clone(),
        &config.mail_from,
    ));
    let blob_store = Arc::new(BlobStore::new(
        http.clone(),
        &config.storage_api_url,
        config.storage_api_key.clone(),
        &config.storage_bucket,
    ));
    let renderer = Arc::new(AgreementRenderer::new(
        http,
        &config.render_api_url,
        config.render_api_key.clone(),
    ));

    // Create shared app state
    let app_state = AppState::new(
        auth_service,
        user_service,
        client_service,
        credit_report_service,
        document_service,
        mailer,
        blob_store,
        renderer,
    );

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::auth_routes())
        .merge(routes::client_routes())
        .merge(routes::credit_report_routes())
        .merge(routes::agreement_routes())
        .merge(routes::document_routes())
        .merge(routes::admin_routes())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(config.cors_allowed_origins.as_deref())?);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}

async fn root(OptionalUser(user): OptionalUser) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(serde_json::json!({
        "service": "Fundline API Server",
        "authenticated": user.is_some(),
    })))
}

async fn health_check() -> &'static str {
    "OK"
}

fn configure_cors(allowed_origins: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(allowed_origins) = allowed_origins else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return Ok(CorsLayer::permissive());
    };

    let origins = allowed_origins
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any))
}
