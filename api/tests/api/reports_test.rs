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
async fn create_report_round_trips_through_the_api() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let (token, _) = generate_jwt(&student);

    let body = json!({
        "title": "Broken window at the chemistry lab",
        "description": "Glass on the walkway, looks like a break-in.",
        "category": "vandalism",
        "severity": 3,
        "location": [75.8245, 22.6826],
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/reports", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "reported");
    assert_eq!(json["data"]["location"]["coordinates"][0], 75.8245);
    assert_eq!(json["data"]["reporterId"], student.id);
}

#[tokio::test]
#[serial]
async fn create_report_reports_every_bad_field() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let (token, _) = generate_jwt(&student);

    let body = json!({
        "title": "ab",
        "description": "x",
        "category": "theft",
        "severity": 9,
        "location": [400.0, 99.0],
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/reports", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.len() >= 4);
}

#[tokio::test]
#[serial]
async fn unknown_category_is_a_field_error_not_a_deserialization_failure() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let (token, _) = generate_jwt(&student);

    let body = json!({
        "title": "Suspicious person",
        "description": "Loitering near the bike racks.",
        "category": "ufo_sighting",
        "severity": 2,
        "location": [75.8245, 22.6826],
    });
    let response = app
        .oneshot(request_with_body("POST", "/api/reports", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "category");
}

#[tokio::test]
#[serial]
async fn detail_read_counts_a_view_and_hides_anonymous_reporters() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let viewer = user_factory::make(&db, Role::Student, campus.id).await;

    let mut new = report_factory::new_report(owner.id, campus.id, 75.8245, 22.6826);
    new.is_anonymous = true;
    let report = db::models::report::Model::create(&db, new).await.unwrap();

    let (token, _) = generate_jwt(&viewer);
    let uri = format!("/api/reports/{}", report.id);
    let response = app
        .oneshot(request("GET", &uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["viewsCount"], 1);
    assert!(json["data"].get("reporterId").is_none());
    assert!(json["data"].get("moderatorNotes").is_none());
}

#[tokio::test]
#[serial]
async fn reports_from_other_campuses_are_invisible() {
    let (app, db) = make_test_app().await;
    let campus_a = campus_factory::make(&db).await;
    let campus_b = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus_a.id).await;
    let outsider = user_factory::make(&db, Role::Student, campus_b.id).await;
    let report = report_factory::make(&db, owner.id, campus_a.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&outsider);
    let uri = format!("/api/reports/{}", report.id);
    let response = app
        .oneshot(request("GET", &uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn nearby_rejects_a_radius_outside_policy_bounds() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let (token, _) = generate_jwt(&student);

    for radius in ["50", "20000"] {
        let uri =
            format!("/api/reports/nearby?longitude=75.8245&latitude=22.6826&radius={radius}");
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
#[serial]
async fn nearby_returns_closest_first_with_distances() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;

    let near = report_factory::make(&db, student.id, campus.id, 75.8245, 22.6836).await;
    let _far = report_factory::make(&db, student.id, campus.id, 75.8245, 22.7326).await;

    let (token, _) = generate_jwt(&student);
    let uri = "/api/reports/nearby?longitude=75.8245&latitude=22.6826&radius=500";
    let response = app
        .oneshot(request("GET", uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["reports"][0]["id"], near.id);
    let distance = json["data"]["reports"][0]["distanceM"].as_f64().unwrap();
    assert!((distance - 111.2).abs() < 2.0, "got {distance}");
}

#[tokio::test]
#[serial]
async fn voting_and_unvoting_through_the_api() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&voter);
    let uri = format!("/api/reports/{}/vote", report.id);

    let response = app
        .clone()
        .oneshot(request_with_body(
            "POST",
            &uri,
            Some(&token),
            &json!({ "vote": "confirm" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["confirmCount"], 1);

    let response = app
        .oneshot(request("DELETE", &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["confirmCount"], 0);
}

#[tokio::test]
#[serial]
async fn edit_is_forbidden_for_non_owners() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let other = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&other);
    let uri = format!("/api/reports/{}", report.id);
    let response = app
        .oneshot(request_with_body(
            "PUT",
            &uri,
            Some(&token),
            &json!({ "title": "Not your report" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn owner_delete_moves_the_report_to_invalid() {
    let (app, db) = make_test_app().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let (token, _) = generate_jwt(&owner);
    let uri = format!("/api/reports/{}", report.id);
    let response = app
        .oneshot(request("DELETE", &uri, Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "invalid");
}

#[tokio::test]
#[serial]
async fn requests_without_a_token_are_rejected() {
    let (app, _db) = make_test_app().await;

    let response = app.oneshot(request("GET", "/api/reports", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
