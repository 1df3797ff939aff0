use async_trait::async_trait;
use serde::Serialize;

use super::{EmailMessage, Mailer, SendResult};
use crate::config::notification::NotificationConfig;

/// Mailer for JSON email delivery APIs that accept
/// `{from, to, subject, text, html}` with a bearer API key.
pub struct ApiMailer {
    url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ApiPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

impl ApiMailer {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, String> {
        if config.api_key.is_empty() {
            return Err("PORTAL_EMAIL_API_KEY is required for the api mailer".to_string());
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: format!("{} <{}>", config.from_name, config.from_address),
            client,
        })
    }
}

#[async_trait]
impl Mailer for ApiMailer {
    fn provider_name(&self) -> &'static str {
        "api"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        let payload = ApiPayload {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text_body,
            html: &message.html_body,
        };

        match self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => {
                if response.status().is_success() {
                    SendResult::sent()
                } else {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    SendResult::failed(format!("Email API error ({}): {}", status, error_text))
                }
            }
            Err(e) => SendResult::failed(format!("Failed to reach email API: {}", e)),
        }
    }
}
