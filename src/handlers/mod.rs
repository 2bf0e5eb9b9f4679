//! API handlers for the Fundline backend

pub mod admin;
pub mod agreements;
pub mod auth;
pub mod clients;
pub mod credit_reports;
pub mod documents;

pub use admin::*;
pub use agreements::*;
pub use auth::*;
pub use clients::*;
pub use credit_reports::*;
pub use documents::*;

// Re-export the auth extractors for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser, OptionalUser};
