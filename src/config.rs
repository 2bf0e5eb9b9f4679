//! Environment configuration, resolved once at startup.

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,

    pub jwt_secret: String,
    pub token_expiry_hours: i64,
    pub bcrypt_cost: u32,

    pub mail_api_url: String,
    pub mail_api_key: Option<String>,
    pub mail_from: String,

    pub storage_api_url: String,
    pub storage_api_key: Option<String>,
    pub storage_bucket: String,

    pub render_api_url: String,
    pub render_api_key: Option<String>,

    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => bail!("JWT_SECRET must be set"),
        };

        Ok(Self {
            database_url: var_or("DATABASE_URL", "postgresql://localhost/fundline"),
            port: var_or("PORT", "3001")
                .parse()
                .context("PORT must be a number")?,

            jwt_secret,
            token_expiry_hours: var_or("TOKEN_EXPIRY_HOURS", "24")
                .parse()
                .context("TOKEN_EXPIRY_HOURS must be a number")?,
            bcrypt_cost: match std::env::var("BCRYPT_COST") {
                Ok(v) => v.parse().context("BCRYPT_COST must be a number")?,
                Err(_) => bcrypt::DEFAULT_COST,
            },

            mail_api_url: var_or("MAIL_API_URL", "http://localhost:8025"),
            mail_api_key: var_opt("MAIL_API_KEY"),
            mail_from: var_or("MAIL_FROM", "onboarding@fundline.example"),

            storage_api_url: var_or("STORAGE_API_URL", "http://localhost:9000"),
            storage_api_key: var_opt("STORAGE_API_KEY"),
            storage_bucket: var_or("STORAGE_BUCKET", "fundline-documents"),

            render_api_url: var_or("RENDER_API_URL", "http://localhost:3005"),
            render_api_key: var_opt("RENDER_API_KEY"),

            cors_allowed_origins: var_opt("CORS_ALLOWED_ORIGINS"),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
