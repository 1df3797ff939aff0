//! Public intake endpoint integration tests
//!
//! Covers:
//! - POST /api/applications: creation, validation, duplicate detection
//! - Operator notification and its failure modes

use std::sync::Arc;

use axum::http::StatusCode;

mod common;
use common::*;

use partner_portal::endpoints::create_router;
use partner_portal::models::account::AccountRole;

#[tokio::test]
async fn test_submit_application_created_and_operator_notified() {
    let (app, _db, mailer) = test_app().await;

    let response = send(
        &app,
        json_request("POST", "/api/applications", application_body(" A@X.com "), None),
    )
    .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["application_id"].as_str().unwrap().len(), 36);

    let to_operator = mailer.sent_to(OPERATOR_EMAIL).await;
    assert_eq!(to_operator.len(), 1);
    assert!(to_operator[0].subject.contains("Jo Partner"));
    assert!(to_operator[0].text_body.contains("a@x.com"));
    assert!(to_operator[0].html_body.contains("Calm &amp; Co"));
}

#[tokio::test]
async fn test_validation_reports_first_field() {
    let (app, _db, mailer) = test_app().await;

    let mut body = application_body("a@x.com");
    body["phone"] = serde_json::json!("phone me");
    body["description"] = serde_json::json!("short");

    let (status, body) = read_json(
        send(&app, json_request("POST", "/api/applications", body, None)).await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "phone");
    assert!(mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_missing_fields_reported_as_validation_errors() {
    let (app, _db, mailer) = test_app().await;

    let mut body = application_body("a@x.com");
    body.as_object_mut().unwrap().remove("name");
    let (status, error) = read_json(
        send(&app, json_request("POST", "/api/applications", body, None)).await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "name");
    assert_eq!(error["detail"], "Please enter your name");

    let mut body = application_body("a@x.com");
    body.as_object_mut().unwrap().remove("description");
    let (status, error) = read_json(
        send(&app, json_request("POST", "/api/applications", body, None)).await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "description");

    let (status, error) = read_json(
        send(
            &app,
            json_request("POST", "/api/applications", serde_json::json!({}), None),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["field"], "name");
    assert!(mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_short_description_rejected() {
    let (app, _db, _mailer) = test_app().await;

    let mut body = application_body("a@x.com");
    body["description"] = serde_json::json!("too short");

    let (status, body) = read_json(
        send(&app, json_request("POST", "/api/applications", body, None)).await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "description");
}

#[tokio::test]
async fn test_duplicate_pending_and_approved_are_distinct_conflicts() {
    let (app, _db, _mailer) = test_app().await;

    let id = submit_application(&app, "a@x.com").await;
    let (pending_status, pending_body) = read_json(
        send(
            &app,
            json_request("POST", "/api/applications", application_body("a@x.com"), None),
        )
        .await,
    )
    .await;
    assert_eq!(pending_status, StatusCode::CONFLICT);

    let (status, _) = review(&app, &id, "approve").await;
    assert_eq!(status, StatusCode::OK);

    let (approved_status, approved_body) = read_json(
        send(
            &app,
            json_request("POST", "/api/applications", application_body("a@x.com"), None),
        )
        .await,
    )
    .await;
    assert_eq!(approved_status, StatusCode::CONFLICT);
    assert_ne!(pending_body["detail"], approved_body["detail"]);
}

#[tokio::test]
async fn test_rejected_applicant_may_reapply() {
    let (app, _db, _mailer) = test_app().await;

    let id = submit_application(&app, "a@x.com").await;
    let (status, _) = review(&app, &id, "reject").await;
    assert_eq!(status, StatusCode::OK);

    let second = submit_application(&app, "a@x.com").await;
    assert_ne!(id, second);
}

#[tokio::test]
async fn test_existing_partner_account_conflict() {
    let (app, db, _mailer) = test_app().await;
    create_test_account(&db, "a@x.com", "password123", AccountRole::Partner).await;

    let (status, body) = read_json(
        send(
            &app,
            json_request("POST", "/api/applications", application_body("a@x.com"), None),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("log in"));
}

#[tokio::test]
async fn test_directory_outage_does_not_block_intake() {
    let db = create_test_db().await;
    let mailer = Arc::new(RecordingMailer::default());
    let state = build_app_state_with(db, mailer, Arc::new(UnavailableDirectory));
    let app = create_router(state);

    let response = send(
        &app,
        json_request("POST", "/api/applications", application_body("a@x.com"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_mail_failure_does_not_fail_intake() {
    let db = create_test_db().await;
    let mailer = Arc::new(RecordingMailer::failing());
    let directory = Arc::new(partner_portal::services::DbAccountDirectory::new(db.clone()));
    let state = build_app_state_with(db, mailer.clone(), directory);
    let app = create_router(state);

    let response = send(
        &app,
        json_request("POST", "/api/applications", application_body("a@x.com"), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(mailer.sent().await.len(), 1);
}
