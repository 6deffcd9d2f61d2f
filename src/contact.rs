// Contact form relay.
// Validates submitted messages and either logs them or forwards them to an email API.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ContactConfig;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Relay(String),
}

impl ContactError {
    /// HTTP status the relay endpoint answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            ContactError::Validation(_) => 400,
            ContactError::Relay(_) => 500,
        }
    }

    /// `{ "error": ... }` response body.
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

/// A contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(ContactError::Validation(
                "Name, email, and message are required".to_string(),
            ));
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ContactError::Validation(
                "Please provide a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Successful relay response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub message: String,
}

/// Email API error payload.
#[derive(Debug, Deserialize)]
struct UpstreamError {
    message: Option<String>,
}

pub struct ContactRelay {
    client: Client,
    config: ContactConfig,
}

impl ContactRelay {
    pub fn new(config: ContactConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Validate and deliver a message. Without an API key the message is only logged.
    pub async fn submit(&self, message: &ContactMessage) -> Result<RelayResponse, ContactError> {
        message.validate()?;

        let Some(api_key) = self.config.api_key.as_deref() else {
            info!(
                name = %message.name,
                email = %message.email,
                "contact message received: {}",
                message.message
            );
            return Ok(RelayResponse {
                message: "Message received".to_string(),
            });
        };

        let payload = json!({
            "from": self.config.from,
            "to": [self.config.to],
            "reply_to": message.email,
            "subject": format!("Portfolio contact from {}", message.name),
            "text": format!(
                "Name: {}\nEmail: {}\n\n{}",
                message.name, message.email, message.message
            ),
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("email relay unreachable: {}", e);
                ContactError::Relay("Failed to send message".to_string())
            })?;

        if response.status().is_success() {
            return Ok(RelayResponse {
                message: "Message sent successfully".to_string(),
            });
        }

        let status = response.status();
        let upstream = response
            .json::<UpstreamError>()
            .await
            .ok()
            .and_then(|e| e.message);
        warn!("email relay rejected message: {} {:?}", status, upstream);
        Err(ContactError::Relay(
            upstream.unwrap_or_else(|| "Failed to send message".to_string()),
        ))
    }
}
