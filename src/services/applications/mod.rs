//! Partner application lifecycle: intake, review and invite redemption.

pub mod intake;
pub mod redemption;
pub mod review;
pub mod store;

pub use intake::{ApplicationSubmission, IntakeHandler};
pub use redemption::{InviteValidation, Redemption, RedemptionHandler};
pub use review::{ReviewDecision, ReviewHandler};
pub use store::{ApplicationFilter, ApplicationPage, ApplicationStore, StatusCounts};

use sea_orm::DbErr;
use thiserror::Error;

use crate::models::partner_application::ApplicationStatus;
use crate::services::validation::FieldViolation;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("An account with this email already exists. Please log in instead.")]
    DuplicateAccount,

    #[error("An application with this email is already awaiting review. We'll be in touch soon.")]
    DuplicatePending,

    #[error("An application with this email has already been approved. Check your inbox for your invite code.")]
    DuplicateApproved,

    #[error("Application has already been reviewed (status: {current})")]
    InvalidTransition { current: ApplicationStatus },

    #[error("This invite code is invalid or has expired.")]
    InvalidOrExpiredCode,

    #[error("Application not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] DbErr),

    #[error("Security error: {0}")]
    Security(String),
}

impl From<FieldViolation> for ApplicationError {
    fn from(violation: FieldViolation) -> Self {
        ApplicationError::Validation {
            field: violation.field,
            message: violation.message,
        }
    }
}

impl ApplicationError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApplicationError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Duplicate error for an existing active application
    pub(crate) fn duplicate_of(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Approved => ApplicationError::DuplicateApproved,
            _ => ApplicationError::DuplicatePending,
        }
    }
}
