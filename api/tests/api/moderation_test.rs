use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;
use tower::util::ServiceExt;

use crate::helpers::{body_json, make_test_app, request, request_with_body};
use api::auth::generate_jwt;
use db::factories::{campus_factory, report_factory, user_factory};
use db::models::user::Role;

#[tokio::test]
#[serial]
async fn students_are_blocked_at_the_guard() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let (token, _) = generate_jwt(&student);

    let response = app
        .oneshot(request("GET", "/api/moderation/summary", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn moderator_verifies_through_the_status_endpoint() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&moderator);
    let uri = format!("/api/moderation/reports/{}/status", report.id);
    let response = app
        .oneshot(request_with_body(
            "PATCH",
            &uri,
            Some(&token),
            &json!({ "action": "verify" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "verified");
}

#[tokio::test]
#[serial]
async fn double_resolve_conflicts() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&moderator);
    let uri = format!("/api/moderation/reports/{}/status", report.id);
    let body = json!({ "action": "resolve", "reason": "Handled by security." });

    let response = app
        .clone()
        .oneshot(request_with_body("PATCH", &uri, Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request_with_body("PATCH", &uri, Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn unknown_action_is_a_validation_error() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&moderator);
    let uri = format!("/api/moderation/reports/{}/status", report.id);
    let response = app
        .oneshot(request_with_body(
            "PATCH",
            &uri,
            Some(&token),
            &json!({ "action": "escalate" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn cross_campus_moderation_is_forbidden() {
    let (app, db) = make_test_app().await;
    let campus_a = campus_factory::make(&db).await;
    let campus_b = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus_a.id).await;
    let foreign_mod = user_factory::make(&db, Role::Moderator, campus_b.id).await;
    let report = report_factory::make(&db, owner.id, campus_a.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&foreign_mod);
    let uri = format!("/api/moderation/reports/{}/status", report.id);
    let response = app
        .oneshot(request_with_body(
            "PATCH",
            &uri,
            Some(&token),
            &json!({ "action": "verify" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn summary_reflects_the_campus_queue() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;
    report_factory::make(&db, owner.id, campus.id, 75.8250, 22.6830).await;

    let (token, _) = generate_jwt(&moderator);
    let response = app
        .oneshot(request("GET", "/api/moderation/summary", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["reported"], 2);
}

#[tokio::test]
#[serial]
async fn ban_requires_an_admin_role() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let admin = user_factory::make(&db, Role::Admin, campus.id).await;
    let target = user_factory::make(&db, Role::Student, campus.id).await;

    let body = json!({ "user_id": target.id, "reason": "Repeated spam reports" });

    let (mod_token, _) = generate_jwt(&moderator);
    let response = app
        .clone()
        .oneshot(request_with_body(
            "POST",
            "/api/moderation/ban-user",
            Some(&mod_token),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (admin_token, _) = generate_jwt(&admin);
    let response = app
        .oneshot(request_with_body(
            "POST",
            "/api/moderation/ban-user",
            Some(&admin_token),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn audit_trail_lists_moderation_actions() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    db::moderation::verify(&db, &moderator, report.id, None)
        .await
        .unwrap();

    let (token, _) = generate_jwt(&moderator);
    let uri = format!("/api/moderation/audit?report_id={}", report.id);
    let response = app
        .oneshot(request("GET", &uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["entries"][0]["action"], "verify_report");
}
