use std::sync::Arc;

use serde::Deserialize;
use validator::Validate;

use super::store::{is_unique_violation, ApplicationStore, NewApplication};
use super::ApplicationError;
use crate::models::partner_application;
use crate::services::directory::AccountDirectory;
use crate::services::notification::{templates, NotificationService};
use crate::services::validation::{first_violation, normalize_email, normalize_optional, validate_phone};

const SUBMISSION_FIELDS: [&str; 5] = ["name", "email", "phone", "company_name", "description"];

/// Public partner application form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationSubmission {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "Please enter your name"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(default, alias = "company")]
    #[validate(length(max = 160, message = "Company name must be at most 160 characters"))]
    pub company_name: Option<String>,
    #[serde(default)]
    #[validate(length(
        min = 10,
        max = 5000,
        message = "Please tell us a little more about your work (at least 10 characters)"
    ))]
    pub description: String,
}

impl ApplicationSubmission {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            company_name: normalize_optional(self.company_name),
            description: self.description.trim().to_string(),
        }
    }
}

impl From<ApplicationSubmission> for NewApplication {
    fn from(s: ApplicationSubmission) -> Self {
        NewApplication {
            name: s.name,
            email: s.email,
            phone: s.phone,
            company_name: s.company_name,
            description: s.description,
        }
    }
}

fn field_message(field: &str) -> &'static str {
    match field {
        "name" => "Please enter your name",
        "email" => "Please enter a valid email address",
        "phone" => "Please enter a valid phone number",
        "company_name" => "Company name must be at most 160 characters",
        _ => "Please tell us a little more about your work (at least 10 characters)",
    }
}

#[derive(Clone)]
pub struct IntakeHandler {
    store: ApplicationStore,
    directory: Arc<dyn AccountDirectory>,
    notification: NotificationService,
}

impl IntakeHandler {
    pub fn new(
        store: ApplicationStore,
        directory: Arc<dyn AccountDirectory>,
        notification: NotificationService,
    ) -> Self {
        Self {
            store,
            directory,
            notification,
        }
    }

    /// Validate, de-duplicate and persist a new application, then notify the
    /// operator. The notification outcome never changes the result.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<partner_application::Model, ApplicationError> {
        let submission = submission.normalized();
        submission.validate().map_err(|e| {
            ApplicationError::from(first_violation(&e, &SUBMISSION_FIELDS, field_message))
        })?;

        let email = submission.email.clone();

        match self.directory.partner_exists(&email).await {
            Ok(true) => return Err(ApplicationError::DuplicateAccount),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Account directory lookup failed, continuing intake");
            }
        }

        if let Some(existing) = self.store.find_active_by_email(&email).await? {
            return Err(ApplicationError::duplicate_of(existing.status));
        }

        let record = match self.store.insert_pending(submission.into()).await {
            Ok(record) => record,
            Err(e) if is_unique_violation(&e) => {
                // Lost a race with a concurrent submission for the same email
                return match self.store.find_active_by_email(&email).await? {
                    Some(existing) => Err(ApplicationError::duplicate_of(existing.status)),
                    None => Err(ApplicationError::Store(e)),
                };
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(application_id = %record.id, "Partner application received");

        let summary = templates::application_received(&record);
        self.notification
            .send_to_operator(summary.subject, summary.text_body, summary.html_body)
            .await;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountRole;
    use crate::models::partner_application::ApplicationStatus;
    use crate::services::directory::DbAccountDirectory;
    use crate::services::notification::LogMailer;
    use crate::test_helpers::{create_test_account, create_test_db};
    use async_trait::async_trait;
    use sea_orm::DbErr;

    struct UnavailableDirectory;

    #[async_trait]
    impl AccountDirectory for UnavailableDirectory {
        async fn partner_exists(&self, _email: &str) -> Result<bool, DbErr> {
            Err(DbErr::Custom("directory offline".to_string()))
        }
    }

    fn submission(email: &str) -> ApplicationSubmission {
        ApplicationSubmission {
            name: "Jo".to_string(),
            email: email.to_string(),
            phone: "0123".to_string(),
            company_name: None,
            description: "We run resilience workshops.".to_string(),
        }
    }

    async fn handler() -> IntakeHandler {
        let db = create_test_db().await;
        IntakeHandler::new(
            ApplicationStore::new(db.clone()),
            Arc::new(DbAccountDirectory::new(db)),
            NotificationService::new(Arc::new(LogMailer), "ops@example.com"),
        )
    }

    #[tokio::test]
    async fn test_submit_creates_pending_record() {
        let intake = handler().await;
        let record = intake.submit(submission("  A@X.com ")).await.unwrap();

        assert_eq!(record.status, ApplicationStatus::Pending);
        assert_eq!(record.email, "a@x.com");
        assert!(record.invite_code.is_none());
    }

    #[tokio::test]
    async fn test_first_violated_field_is_reported() {
        let intake = handler().await;
        let mut bad = submission("not-an-email");
        bad.description = "short".to_string();

        match intake.submit(bad).await {
            Err(ApplicationError::Validation { field, .. }) => assert_eq!(field, "email"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_description_minimum_length() {
        let intake = handler().await;
        let mut bad = submission("a@x.com");
        bad.description = "   too short   ".to_string();

        match intake.submit(bad).await {
            Err(ApplicationError::Validation { field, .. }) => assert_eq!(field, "description"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_pending_rejected() {
        let intake = handler().await;
        intake.submit(submission("a@x.com")).await.unwrap();

        let err = intake.submit(submission("A@x.com")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicatePending));
    }

    #[tokio::test]
    async fn test_existing_partner_account_rejected() {
        let db = create_test_db().await;
        create_test_account(&db, "a@x.com", "password123", AccountRole::Partner).await;
        let intake = IntakeHandler::new(
            ApplicationStore::new(db.clone()),
            Arc::new(DbAccountDirectory::new(db)),
            NotificationService::new(Arc::new(LogMailer), "ops@example.com"),
        );

        let err = intake.submit(submission("a@x.com")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_directory_failure_does_not_block_intake() {
        let db = create_test_db().await;
        let intake = IntakeHandler::new(
            ApplicationStore::new(db),
            Arc::new(UnavailableDirectory),
            NotificationService::new(Arc::new(LogMailer), "ops@example.com"),
        );

        assert!(intake.submit(submission("a@x.com")).await.is_ok());
    }
}
