//! Outbound mail client
//!
//! Talks to an HTTP JSON mail provider. Used for alert notifications
//! and password reset links.

use serde::{Deserialize, Serialize};

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// Mail provider client
#[derive(Clone)]
pub struct MailClient {
    api_endpoint: String,
    api_key: String,
    from_address: String,
    http_client: reqwest::Client,
}

/// Outgoing message payload
#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MailApiResponse {
    #[serde(default)]
    message: Option<String>,
}

impl MailClient {
    /// Create a new mail client
    pub fn new(config: &MailConfig) -> Self {
        Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Send a plain-text email
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let request = SendMailRequest {
            from: &self.from_address,
            to,
            subject,
            text: body,
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::MailError(format!("Failed to send mail: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error: MailApiResponse = response.json().await.unwrap_or(MailApiResponse {
                message: Some("Unknown error".to_string()),
            });
            Err(AppError::MailError(
                error.message.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
