mod api;
mod email;
mod logging;
pub mod templates;

pub use api::ApiMailer;
pub use email::SmtpMailer;
pub use logging::LogMailer;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::notification::{MailerKind, NotificationConfig};
use crate::error::{AppError, Result};

/// Outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Result of sending a notification
#[derive(Debug)]
pub struct SendResult {
    pub success: bool,
    pub error: Option<String>,
}

impl SendResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for email delivery backends
#[async_trait]
pub trait Mailer: Send + Sync {
    fn provider_name(&self) -> &'static str;
    async fn send(&self, message: &EmailMessage) -> SendResult;
}

/// Notification service shared by the request handlers.
///
/// Every send is a single attempt. Callers decide whether a failure matters;
/// for intake and review it never does, the record is already saved.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    operator_address: String,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>, operator_address: impl Into<String>) -> Self {
        Self {
            mailer,
            operator_address: operator_address.into(),
        }
    }

    /// Build the service with the mailer selected in configuration
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let mailer: Arc<dyn Mailer> = match config.mailer {
            MailerKind::Smtp => Arc::new(SmtpMailer::from_config(config).map_err(AppError::Internal)?),
            MailerKind::Api => Arc::new(ApiMailer::from_config(config).map_err(AppError::Internal)?),
            MailerKind::Log => Arc::new(LogMailer),
        };
        tracing::info!(provider = mailer.provider_name(), "Notification mailer initialized");
        Ok(Self::new(mailer, config.operator_address.clone()))
    }

    pub fn operator_address(&self) -> &str {
        &self.operator_address
    }

    /// Send a message, logging the outcome
    pub async fn send(&self, message: &EmailMessage) -> SendResult {
        let result = self.mailer.send(message).await;
        if result.success {
            tracing::info!(
                provider = self.mailer.provider_name(),
                recipient = %mask_recipient(&message.to),
                subject = %message.subject,
                "Email sent"
            );
        } else {
            tracing::warn!(
                provider = self.mailer.provider_name(),
                recipient = %mask_recipient(&message.to),
                subject = %message.subject,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Email delivery failed"
            );
        }
        result
    }

    /// Send a message to the operator mailbox
    pub async fn send_to_operator(
        &self,
        subject: String,
        text_body: String,
        html_body: String,
    ) -> SendResult {
        let message = EmailMessage {
            to: self.operator_address.clone(),
            subject,
            text_body,
            html_body,
        };
        self.send(&message).await
    }
}

/// Mask an email address for logs: first two characters and the domain
pub(crate) fn mask_recipient(recipient: &str) -> String {
    match recipient.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let prefix: String = local.chars().take(2).collect();
            format!("{}***@{}", prefix, domain)
        }
        _ => "***@***".to_string(),
    }
}
