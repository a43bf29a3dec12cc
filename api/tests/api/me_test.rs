use axum::http::StatusCode;
use serial_test::serial;
use tower::util::ServiceExt;

use crate::helpers::{body_json, make_test_app, request};
use api::auth::generate_jwt;
use db::factories::{campus_factory, report_factory, user_factory};
use db::models::user::Role;

#[tokio::test]
#[serial]
async fn my_reports_include_every_status() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;

    let r1 = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;
    report_factory::make(&db, owner.id, campus.id, 75.8250, 22.6830).await;
    db::moderation::reject(&db, &moderator, r1.id, None)
        .await
        .unwrap();

    let (token, _) = generate_jwt(&owner);
    let response = app
        .oneshot(request("GET", "/api/me/reports", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["reports"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[serial]
async fn notifications_flow_from_moderation_to_inbox() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    db::moderation::verify(&db, &moderator, report.id, None)
        .await
        .unwrap();

    let (token, _) = generate_jwt(&owner);
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/me/notifications?unread_only=true",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let notifications = json["data"]["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    let notification_id = notifications[0]["id"].as_i64().unwrap();

    // Mark read, then the unread view is empty.
    let uri = format!("/api/me/notifications/{notification_id}/read");
    let response = app
        .clone()
        .oneshot(request("POST", &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(
            "GET",
            "/api/me/notifications?unread_only=true",
            Some(&token),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["data"]["notifications"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn marking_someone_elses_notification_is_not_found() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let other = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    db::moderation::verify(&db, &moderator, report.id, None)
        .await
        .unwrap();

    let inbox = db::models::notification::Model::find_for_user(&db, owner.id, false)
        .await
        .unwrap();
    let notification_id = inbox[0].id;

    let (token, _) = generate_jwt(&other);
    let uri = format!("/api/me/notifications/{notification_id}/read");
    let response = app
        .oneshot(request("POST", &uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
