use serial_test::serial;

use crate::factories::{campus_factory, report_factory, user_factory};
use crate::models::report::Model as Report;
use crate::models::report_vote::{self, VoteType};
use crate::models::user::Role;
use crate::test_utils::setup_test_db;

#[tokio::test]
#[serial]
async fn confirm_vote_bumps_tally_and_stores_row() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let updated = Report::add_vote(&db, report.id, voter.id, VoteType::Confirm)
        .await
        .unwrap();

    assert_eq!(updated.confirm_count, 1);
    assert_eq!(updated.dispute_count, 0);
    assert_eq!(updated.net_votes(), 1);

    let row = report_vote::Model::find_by_report_and_user(&db, report.id, voter.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.vote, VoteType::Confirm);
}

#[tokio::test]
#[serial]
async fn recasting_same_vote_is_a_noop() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    Report::add_vote(&db, report.id, voter.id, VoteType::Confirm)
        .await
        .unwrap();
    let updated = Report::add_vote(&db, report.id, voter.id, VoteType::Confirm)
        .await
        .unwrap();

    assert_eq!(updated.confirm_count, 1);
    assert_eq!(updated.dispute_count, 0);
}

#[tokio::test]
#[serial]
async fn switching_vote_swaps_both_tallies() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    Report::add_vote(&db, report.id, voter.id, VoteType::Confirm)
        .await
        .unwrap();
    let updated = Report::add_vote(&db, report.id, voter.id, VoteType::Dispute)
        .await
        .unwrap();

    assert_eq!(updated.confirm_count, 0);
    assert_eq!(updated.dispute_count, 1);
    assert_eq!(updated.net_votes(), -1);

    // Still exactly one ledger row for this voter.
    let row = report_vote::Model::find_by_report_and_user(&db, report.id, voter.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.vote, VoteType::Dispute);
}

#[tokio::test]
#[serial]
async fn removing_a_vote_decrements_its_tally() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    Report::add_vote(&db, report.id, voter.id, VoteType::Dispute)
        .await
        .unwrap();
    let updated = Report::remove_vote(&db, report.id, voter.id).await.unwrap();

    assert_eq!(updated.dispute_count, 0);
    assert!(
        report_vote::Model::find_by_report_and_user(&db, report.id, voter.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
async fn removing_an_absent_vote_is_a_noop_not_an_error() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let voter = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    let updated = Report::remove_vote(&db, report.id, voter.id).await.unwrap();
    assert_eq!(updated.confirm_count, 0);
    assert_eq!(updated.dispute_count, 0);
}

#[tokio::test]
#[serial]
async fn tallies_track_multiple_voters() {
    let db = setup_test_db().await;
    let campus = campus_factory::make(&db).await;
    let owner = user_factory::make(&db, Role::Student, campus.id).await;
    let report = report_factory::make(&db, owner.id, campus.id, 75.8245, 22.6826).await;

    for _ in 0..3 {
        let voter = user_factory::make(&db, Role::Student, campus.id).await;
        Report::add_vote(&db, report.id, voter.id, VoteType::Confirm)
            .await
            .unwrap();
    }
    let disputer = user_factory::make(&db, Role::Student, campus.id).await;
    let updated = Report::add_vote(&db, report.id, disputer.id, VoteType::Dispute)
        .await
        .unwrap();

    assert_eq!(updated.confirm_count, 3);
    assert_eq!(updated.dispute_count, 1);
    assert_eq!(updated.net_votes(), 2);
}
