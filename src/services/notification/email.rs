use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{EmailMessage, Mailer, SendResult};
use crate::config::notification::NotificationConfig;

/// SMTP relay mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .or_else(|_| config.from_address.parse::<Mailbox>())
            .map_err(|e| format!("Invalid from email address: {}", e))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn provider_name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        let to_mailbox: Mailbox = match message.to.parse() {
            Ok(mbox) => mbox,
            Err(_) => return SendResult::failed("Invalid recipient email address"),
        };

        let email = match Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(message.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            )) {
            Ok(email) => email,
            Err(e) => return SendResult::failed(format!("Failed to build email: {}", e)),
        };

        match self.transport.send(email).await {
            Ok(_) => SendResult::sent(),
            Err(e) => SendResult::failed(format!("Failed to send email: {}", e)),
        }
    }
}
