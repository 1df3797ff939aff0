use async_trait::async_trait;

use super::{mask_recipient, EmailMessage, Mailer, SendResult};

/// Mailer used when no delivery backend is configured. Messages only reach
/// the log, so local runs and previews never send real email.
///
/// Bodies can carry invite codes and are only logged at debug level.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn provider_name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        tracing::info!(
            recipient = %mask_recipient(&message.to),
            subject = %message.subject,
            "Email not delivered (log mailer)"
        );
        tracing::debug!(body = %message.text_body, "Log mailer message body");
        SendResult::sent()
    }
}
