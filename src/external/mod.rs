//! External collaborators: transactional mail, blob storage, and the PDF
//! render service. Each is a stateless call-and-response wrapper over HTTP.

pub mod email;
pub mod renderer;
pub mod storage;

pub use email::Mailer;
pub use renderer::{AgreementData, AgreementRenderer};
pub use storage::BlobStore;

/// Error from any external collaborator.
///
/// Status codes are kept as plain `u16`; reqwest and axum sit on different
/// `http` major versions.
#[derive(Debug, thiserror::Error)]
pub enum ExternalError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned status {status}")]
    UnexpectedStatus { service: &'static str, status: u16 },
}

impl ExternalError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ExternalError::Http { service, source }
    }

    pub(crate) fn check_status(
        service: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Self> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ExternalError::UnexpectedStatus {
                service,
                status: status.as_u16(),
            })
        }
    }
}
