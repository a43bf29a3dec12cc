use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;
use tower::util::ServiceExt;

use crate::helpers::{body_json, make_test_app, request_with_body};
use db::factories::{campus_factory, user_factory};
use db::models::user::Role;

#[tokio::test]
#[serial]
async fn register_creates_a_student_in_the_join_code_campus() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;

    let body = json!({
        "username": "new_student",
        "email": "new_student@example.edu",
        "password": "longenoughpassword",
        "join_code": campus.join_code,
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["user"]["role"], "student");
    assert_eq!(json["data"]["user"]["campus_id"], campus.id);
    assert!(json["data"]["token"].is_string());
}

#[tokio::test]
#[serial]
async fn register_rejects_an_unknown_join_code() {
    let (app, _db) = make_test_app().await;

    let body = json!({
        "username": "new_student",
        "email": "new_student@example.edu",
        "password": "longenoughpassword",
        "join_code": "NOPE1234",
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn register_rejects_a_duplicate_email() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let existing = user_factory::make(&db, Role::Student, campus.id).await;

    let body = json!({
        "username": "someone_else",
        "email": existing.email,
        "password": "longenoughpassword",
        "join_code": campus.join_code,
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn login_rejects_bad_credentials() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let user = user_factory::make(&db, Role::Student, campus.id).await;

    let body = json!({ "email": user.email, "password": "wrong-password" });
    let response = app
        .oneshot(request_with_body("POST", "/api/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn login_returns_a_token_for_valid_credentials() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let user = user_factory::make(&db, Role::Student, campus.id).await;

    // The factory hashes this fixed password.
    let body = json!({ "email": user.email, "password": "password123" });
    let response = app
        .oneshot(request_with_body("POST", "/api/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert!(json["data"]["token"].is_string());
}
