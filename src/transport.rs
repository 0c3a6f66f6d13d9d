//! Outbound message delivery behind the [`Transport`] seam.

use crate::types::{RelayError, Result};
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// One message for one user. `action` is the single actionable control
/// offered alongside the greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
    pub action: Option<String>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    pub fn with_action(text: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Some(action.into()),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, user_id: &str, message: OutgoingMessage) -> Result<()>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    user_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
}

/// Delivers messages as JSON POSTs to a configured webhook endpoint.
pub struct WebhookTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl WebhookTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn deliver(&self, user_id: &str, message: OutgoingMessage) -> Result<()> {
        let payload = WebhookPayload {
            user_id,
            text: &message.text,
            action: message.action.as_deref(),
        };

        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(RelayError::Transport(format!(
                "webhook returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Prints messages to stdout, for local runs without a webhook.
pub struct ConsoleTransport;

#[async_trait]
impl Transport for ConsoleTransport {
    async fn deliver(&self, user_id: &str, message: OutgoingMessage) -> Result<()> {
        match &message.action {
            Some(action) => println!("[{}] {}\n  [{}]", user_id, message.text, action),
            None => println!("[{}] {}", user_id, message.text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_payload_shape() {
        let payload = WebhookPayload {
            user_id: "42",
            text: "hello",
            action: Some("Latest news"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["user_id"], "42");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["action"], "Latest news");
    }

    #[test]
    fn webhook_payload_omits_absent_action() {
        let payload = WebhookPayload {
            user_id: "42",
            text: "hello",
            action: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("action").is_none());
    }

    #[test]
    fn webhook_transport_rejects_bad_endpoint() {
        assert!(WebhookTransport::new("not a url").is_err());
    }
}
