//! Contact, training and wellbeing-assessment enquiries.
//!
//! Enquiries are not stored. The operator email is the only record, so unlike
//! intake a failed send is reported back to the visitor.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::services::notification::{templates, NotificationService};
use crate::services::validation::{
    first_violation, normalize_email, normalize_optional, validate_phone, FieldViolation,
};

const ENQUIRY_FIELDS: [&str; 7] = [
    "name",
    "email",
    "phone",
    "company",
    "message",
    "team_size",
    "topics",
];

#[derive(Debug, Error)]
pub enum EnquiryError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("We couldn't send your message just now. Please try again in a few minutes.")]
    Delivery(String),
}

impl From<FieldViolation> for EnquiryError {
    fn from(violation: FieldViolation) -> Self {
        EnquiryError::Validation {
            field: violation.field,
            message: violation.message,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryKind {
    #[default]
    Contact,
    Training,
    WellbeingAssessment,
}

impl EnquiryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EnquiryKind::Contact => "Contact enquiry",
            EnquiryKind::Training => "Training enquiry",
            EnquiryKind::WellbeingAssessment => "Wellbeing assessment request",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Enquiry {
    #[serde(default)]
    pub kind: EnquiryKind,
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Please enter your name"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[serde(default, alias = "company_name")]
    #[validate(length(max = 160, message = "Company name must be at most 160 characters"))]
    pub company: Option<String>,
    #[serde(default)]
    #[validate(length(min = 2, max = 5000, message = "Please enter a message"))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 40, message = "Team size is too long"))]
    pub team_size: Option<String>,
    #[serde(default)]
    #[validate(length(max = 12, message = "Please choose at most 12 topics"))]
    pub topics: Vec<String>,
}

impl Enquiry {
    fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: normalize_optional(self.phone),
            company: normalize_optional(self.company),
            message: self.message.trim().to_string(),
            team_size: normalize_optional(self.team_size),
            topics: self
                .topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Label/value rows for the operator email, optional fields only when set
    fn summary_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("Name", self.name.clone()), ("Email", self.email.clone())];
        if let Some(phone) = &self.phone {
            fields.push(("Phone", phone.clone()));
        }
        if let Some(company) = &self.company {
            fields.push(("Company", company.clone()));
        }
        if let Some(team_size) = &self.team_size {
            fields.push(("Team size", team_size.clone()));
        }
        if !self.topics.is_empty() {
            fields.push(("Topics", self.topics.join(", ")));
        }
        fields
    }
}

fn field_message(field: &str) -> &'static str {
    match field {
        "name" => "Please enter your name",
        "email" => "Please enter a valid email address",
        "phone" => "Please enter a valid phone number",
        "message" => "Please enter a message",
        _ => "Please check this field",
    }
}

#[derive(Clone)]
pub struct EnquiryHandler {
    notification: NotificationService,
}

impl EnquiryHandler {
    pub fn new(notification: NotificationService) -> Self {
        Self { notification }
    }

    pub async fn submit(&self, enquiry: Enquiry) -> Result<EnquiryKind, EnquiryError> {
        let enquiry = enquiry.normalized();
        enquiry.validate().map_err(|e| {
            EnquiryError::from(first_violation(&e, &ENQUIRY_FIELDS, field_message))
        })?;

        let fields = enquiry.summary_fields();
        let email = templates::enquiry_received(enquiry.kind.label(), &fields, &enquiry.message);
        let result = self
            .notification
            .send_to_operator(email.subject, email.text_body, email.html_body)
            .await;

        if !result.success {
            return Err(EnquiryError::Delivery(
                result.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        tracing::info!(kind = ?enquiry.kind, "Enquiry forwarded to operator");
        Ok(enquiry.kind)
    }
}
