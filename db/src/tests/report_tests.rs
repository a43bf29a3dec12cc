use chrono::Duration;
use serial_test::serial;

use crate::factories::{campus_factory, report_factory, user_factory};
use crate::models::report::{Category, Model as Report, ReportEdit, Status};
use crate::models::user::Role;
use crate::moderation::ModerationError;
use crate::test_utils::setup_test_db;

#[tokio::test]
#[serial]
async fn create_starts_in_reported_with_zeroed_counters() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;

    let report = report_factory::make(&db, student.id, campus.id, 75.8245, 22.6826).await;

    assert_eq!(report.status, Status::Reported);
    assert_eq!(report.confirm_count, 0);
    assert_eq!(report.dispute_count, 0);
    assert_eq!(report.comments_count, 0);
    assert_eq!(report.views_count, 0);
    assert!(report.spam_reports.is_empty());
    assert!(!report.is_spam);
    assert!(!report.is_edited);
    assert!(report.edit_history.0.is_empty());
}

#[tokio::test]
#[serial]
async fn create_collects_every_field_violation_at_once() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;

    let mut new = report_factory::new_report(student.id, campus.id, 200.0, 95.0);
    new.title = "ab".into();
    new.description = "x".into();
    new.severity = 9;
    new.media_urls = vec!["not a url".into()];

    let err = Report::create(&db, new).await.unwrap_err();
    let ModerationError::Validation(violations) = err else {
        panic!("expected validation error");
    };

    let fields: Vec<&str> = violations.iter().map(|v| v.field).collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"description"));
    assert!(fields.contains(&"severity"));
    assert!(fields.contains(&"location"));
    assert!(fields.contains(&"media_urls"));
}

#[tokio::test]
#[serial]
async fn create_rejects_more_than_ten_media_urls() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;

    let mut new = report_factory::new_report(student.id, campus.id, 75.8245, 22.6826);
    new.media_urls = (0..11)
        .map(|i| format!("https://media.example.edu/photo{i}.jpg"))
        .collect();

    assert!(matches!(
        Report::create(&db, new).await,
        Err(ModerationError::Validation(_))
    ));
}

#[tokio::test]
#[serial]
async fn create_trims_title_and_description() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;

    let mut new = report_factory::new_report(student.id, campus.id, 75.8245, 22.6826);
    new.title = "  Stolen laptop  ".into();
    new.description = "  Taken from the study hall.  ".into();

    let report = Report::create(&db, new).await.unwrap();
    assert_eq!(report.title, "Stolen laptop");
    assert_eq!(report.description, "Taken from the study hall.");
}

#[tokio::test]
#[serial]
async fn edit_appends_prior_state_snapshot() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let student = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, student.id, campus.id, 75.8245, 22.6826).await;

    let original_title = report.title.clone();
    let edit = ReportEdit {
        title: Some("Stolen bicycle (blue frame)".into()),
        severity: Some(4),
        ..Default::default()
    };

    let edited = report.apply_edit(&db, student.id, edit).await.unwrap();

    assert!(edited.is_edited);
    assert!(edited.edited_at.is_some());
    assert_eq!(edited.title, "Stolen bicycle (blue frame)");
    assert_eq!(edited.severity, 4);
    assert_eq!(edited.edit_history.0.len(), 1);
    // The snapshot holds the values as they were before this edit.
    let snapshot = &edited.edit_history.0[0];
    assert_eq!(snapshot.changes.title, original_title);
    assert_eq!(snapshot.changes.severity, 3);
    assert_eq!(snapshot.changes.category, Category::Theft);
}

#[tokio::test]
#[serial]
async fn edit_denied_for_non_owner() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let other = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let edit = ReportEdit {
        title: Some("Hijacked title".into()),
        ..Default::default()
    };
    assert!(matches!(
        report.apply_edit(&db, other.id, edit).await,
        Err(ModerationError::NotOwner)
    ));
}

#[tokio::test]
#[serial]
async fn edit_denied_after_window_expires() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let too_late = report.created_at + Duration::minutes(31);
    assert!(matches!(
        report.edit_guard(owner.id, too_late),
        Err(ModerationError::EditWindowExpired)
    ));

    let just_in_time = report.created_at + Duration::minutes(29);
    assert!(report.edit_guard(owner.id, just_in_time).is_ok());
}

#[tokio::test]
#[serial]
async fn edit_denied_once_moderated() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let moderator = user_factory::make(&db, Role::Moderator, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let verified = crate::moderation::verify(&db, &moderator, report.id, None)
        .await
        .unwrap();

    let edit = ReportEdit {
        title: Some("Changing after the fact".into()),
        ..Default::default()
    };
    assert!(matches!(
        verified.apply_edit(&db, owner.id, edit).await,
        Err(ModerationError::InvalidTransition(_))
    ));
}

#[tokio::test]
#[serial]
async fn empty_edit_is_a_validation_error() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    assert!(matches!(
        report.apply_edit(&db, owner.id, ReportEdit::default()).await,
        Err(ModerationError::Validation(_))
    ));
}

#[tokio::test]
#[serial]
async fn view_counter_increments_without_dedup() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    Report::increment_views(&db, report.id).await.unwrap();
    Report::increment_views(&db, report.id).await.unwrap();
    Report::increment_views(&db, report.id).await.unwrap();

    let fresh = Report::find_by_id(&db, report.id).await.unwrap().unwrap();
    assert_eq!(fresh.views_count, 3);
}
