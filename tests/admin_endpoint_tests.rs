//! Admin dashboard integration tests
//!
//! Covers:
//! - Role enforcement on /api/admin/*
//! - Review decisions, invalid transitions and the invite email
//! - Listing, search, notes and stats

use axum::http::StatusCode;

mod common;
use common::*;

use partner_portal::models::account::AccountRole;

#[tokio::test]
async fn test_admin_routes_require_session() {
    let (app, _db, _mailer) = test_app().await;

    let response = send(&app, get_request("/api/admin/applications", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_partner_cannot_use_admin_routes() {
    let (app, db, _mailer) = test_app().await;
    create_test_account(&db, "p@x.com", "password123", AccountRole::Partner).await;
    let cookie = login(&app, "p@x.com", "password123").await;

    let response = send(&app, get_request("/api/admin/stats", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_approve_emails_invite_and_returns_code() {
    let (app, db, mailer) = test_app().await;
    let id = submit_application(&app, "a@x.com").await;

    let (status, body) = review(&app, &id, "approve").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["reviewed_by"], ADMIN_EMAIL);

    let code = stored_invite_code(&db, &id).await.unwrap();
    assert_eq!(code.len(), 32);
    assert_eq!(body["invite_code"], code.as_str());

    let invites = mailer.sent_to("a@x.com").await;
    assert_eq!(invites.len(), 1);
    assert!(invites[0].text_body.contains(&code));
    assert!(invites[0]
        .text_body
        .contains("https://portal.test/partners/signup?email=a%40x.com"));
}

#[tokio::test]
async fn test_reject_sends_no_email_and_issues_no_code() {
    let (app, db, mailer) = test_app().await;
    let id = submit_application(&app, "a@x.com").await;

    let (status, body) = review(&app, &id, "reject").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert!(body["invite_code"].is_null());

    assert!(stored_invite_code(&db, &id).await.is_none());
    assert!(mailer.sent_to("a@x.com").await.is_empty());
}

#[tokio::test]
async fn test_second_review_conflicts() {
    let (app, _db, _mailer) = test_app().await;
    let id = submit_application(&app, "a@x.com").await;

    let (first, _) = review(&app, &id, "approve").await;
    assert_eq!(first, StatusCode::OK);

    let (second, body) = review(&app, &id, "reject").await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("approved"));
}

#[tokio::test]
async fn test_review_unknown_application_not_found() {
    let (app, _db, _mailer) = test_app().await;

    let (status, _) = review(&app, "00000000-0000-0000-0000-000000000000", "approve").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filter_and_search() {
    let (app, _db, _mailer) = test_app().await;
    let first = submit_application(&app, "first@x.com").await;
    submit_application(&app, "second@x.com").await;
    review(&app, &first, "approve").await;
    let cookie = admin_cookie(&app).await;

    let (status, all) = read_json(
        send(&app, get_request("/api/admin/applications", Some(&cookie))).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total"], 2);

    let (_, pending) = read_json(
        send(
            &app,
            get_request("/api/admin/applications?status=pending", Some(&cookie)),
        )
        .await,
    )
    .await;
    assert_eq!(pending["total"], 1);
    assert_eq!(pending["items"][0]["email"], "second@x.com");

    let (_, searched) = read_json(
        send(
            &app,
            get_request("/api/admin/applications?search=first", Some(&cookie)),
        )
        .await,
    )
    .await;
    assert_eq!(searched["total"], 1);

    let (bad_status, _) = read_json(
        send(
            &app,
            get_request("/api/admin/applications?status=archived", Some(&cookie)),
        )
        .await,
    )
    .await;
    assert_eq!(bad_status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_notes_and_get_detail() {
    let (app, _db, _mailer) = test_app().await;
    let id = submit_application(&app, "a@x.com").await;
    let cookie = admin_cookie(&app).await;

    let (status, body) = read_json(
        send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/admin/applications/{}/notes", id),
                serde_json::json!({ "admin_notes": "Spoke on the phone" }),
                Some(&cookie),
            ),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin_notes"], "Spoke on the phone");
    assert_eq!(body["status"], "pending");

    let (status, detail) = read_json(
        send(
            &app,
            get_request(&format!("/api/admin/applications/{}", id), Some(&cookie)),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["phone"], "0123");
    assert_eq!(detail["admin_notes"], "Spoke on the phone");
}

#[tokio::test]
async fn test_stats_counts_statuses_and_partners() {
    let (app, db, _mailer) = test_app().await;
    let first = submit_application(&app, "first@x.com").await;
    let second = submit_application(&app, "second@x.com").await;
    submit_application(&app, "third@x.com").await;
    review(&app, &first, "approve").await;
    review(&app, &second, "reject").await;
    create_test_account(&db, "p@x.com", "password123", AccountRole::Partner).await;
    let cookie = admin_cookie(&app).await;

    let (status, stats) = read_json(
        send(&app, get_request("/api/admin/stats", Some(&cookie))).await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["applications"]["pending"], 1);
    assert_eq!(stats["applications"]["approved"], 1);
    assert_eq!(stats["applications"]["rejected"], 1);
    assert_eq!(stats["partners"], 1);

    let (_, partners) = read_json(
        send(&app, get_request("/api/admin/partners", Some(&cookie))).await,
    )
    .await;
    assert_eq!(partners["total"], 1);
    assert_eq!(partners["items"][0]["email"], "p@x.com");
    assert!(partners["items"][0].get("hashed_password").is_none());
}

#[tokio::test]
async fn test_invite_code_recoverable_when_email_fails() {
    let db = create_test_db().await;
    create_test_account(&db, ADMIN_EMAIL, ADMIN_PASSWORD, AccountRole::Admin).await;
    let mailer = std::sync::Arc::new(RecordingMailer::failing());
    let directory = std::sync::Arc::new(partner_portal::services::DbAccountDirectory::new(db.clone()));
    let app = partner_portal::endpoints::create_router(build_app_state_with(
        db.clone(),
        mailer.clone(),
        directory,
    ));

    let id = submit_application(&app, "a@x.com").await;
    let (status, reviewed) = review(&app, &id, "approve").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mailer.sent_to("a@x.com").await.len(), 1);

    let cookie = admin_cookie(&app).await;
    let (status, detail) = read_json(
        send(&app, get_request(&format!("/api/admin/applications/{}", id), Some(&cookie))).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code = stored_invite_code(&db, &id).await.unwrap();
    assert_eq!(reviewed["invite_code"], code.as_str());
    assert_eq!(detail["invite_code"], code.as_str());

    let response = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            serde_json::json!({ "email": "a@x.com", "code": code, "password": "partner-password" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, detail) = read_json(
        send(&app, get_request(&format!("/api/admin/applications/{}", id), Some(&cookie))).await,
    )
    .await;
    assert!(detail["invite_code"].is_null());
}
