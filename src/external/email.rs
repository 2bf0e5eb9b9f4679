//! Transactional email over the mail provider's HTTP API.
//!
//! Sends are best-effort at every call site: a failed notification is logged
//! and never fails the request that triggered it.

use serde_json::json;

use super::ExternalError;

const SERVICE: &str = "mail";

pub struct Mailer {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    from: String,
}

impl Mailer {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: Option<String>, from: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            from: from.to_string(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), ExternalError> {
        let mut request = self
            .http
            .post(format!("{}/messages", self.base_url))
            .json(&message_body(&self.from, to, subject, text));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(ExternalError::http(SERVICE))?;
        ExternalError::check_status(SERVICE, response)?;
        Ok(())
    }

    /// Fire-and-log variant used for notifications.
    pub async fn send_or_log(&self, to: &str, subject: &str, text: &str) {
        if let Err(err) = self.send(to, subject, text).await {
            tracing::warn!(error = %err, to, subject, "notification email failed");
        }
    }
}

fn message_body(from: &str, to: &str, subject: &str, text: &str) -> serde_json::Value {
    json!({
        "from": from,
        "to": to,
        "subject": subject,
        "text": text,
    })
}
