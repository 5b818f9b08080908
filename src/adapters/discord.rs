use crate::config::toml_config::PublishConfig;
use crate::domain::ports::Publisher;
use crate::utils::error::{DigestError, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Single POST to a Discord-style webhook. No retry.
pub struct DiscordWebhook {
    client: Client,
    url: String,
    max_message_chars: usize,
}

impl DiscordWebhook {
    pub fn new(url: String, config: &PublishConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url,
            max_message_chars: config.max_message_chars,
        })
    }
}

impl Publisher for DiscordWebhook {
    async fn publish(&self, message: &str) -> Result<String> {
        let length = message.chars().count();
        if length > self.max_message_chars {
            tracing::warn!(
                "⚠️ Message is {} characters, above the {} character limit; the webhook may reject it",
                length,
                self.max_message_chars
            );
        }

        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content: message })
            .send()
            .await
            // URL 內含 webhook token，不可出現在錯誤訊息
            .map_err(|e| DigestError::PublishError {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::PublishError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        tracing::debug!("Webhook accepted message with status {}", status);
        Ok(format!("webhook (HTTP {})", status.as_u16()))
    }
}
