use std::env;

/// Which mailer backs the notification service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailerKind {
    /// SMTP relay (env: `PORTAL_SMTP_*`)
    Smtp,
    /// JSON email delivery API (env: `PORTAL_EMAIL_API_*`)
    Api,
    /// Only log outgoing mail
    Log,
}

impl MailerKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "smtp" => MailerKind::Smtp,
            "api" => MailerKind::Api,
            _ => MailerKind::Log,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub mailer: MailerKind,
    pub from_address: String,
    pub from_name: String,
    /// Mailbox receiving intake and enquiry notifications
    pub operator_address: String,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_starttls: bool,

    pub api_url: String,
    pub api_key: String,
}

impl NotificationConfig {
    pub fn from_env() -> Self {
        Self {
            mailer: MailerKind::parse(&env::var("PORTAL_MAILER").unwrap_or_default()),
            from_address: env::var("PORTAL_MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
            from_name: env::var("PORTAL_MAIL_FROM_NAME")
                .unwrap_or_else(|_| "Partner Portal".to_string()),
            operator_address: env::var("PORTAL_OPERATOR_EMAIL")
                .unwrap_or_else(|_| "operator@localhost".to_string()),

            smtp_host: env::var("PORTAL_SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("PORTAL_SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("PORTAL_SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("PORTAL_SMTP_PASSWORD").unwrap_or_default(),
            smtp_starttls: env::var("PORTAL_SMTP_STARTTLS")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),

            api_url: env::var("PORTAL_EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            api_key: env::var("PORTAL_EMAIL_API_KEY").unwrap_or_default(),
        }
    }
}
