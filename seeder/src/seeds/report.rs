use crate::seed::Seeder;
use db::models::report::{Category, Model, NewReport};
use db::models::report_vote::VoteType;
use db::models::{campus, comment, user};
use db::moderation;
use fake::{Fake, faker::lorem::en::Sentence};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

// One synthetic centre per campus, far enough apart that nearby queries
// never bleed across tenants.
const CENTRES: [(f64, f64); 3] = [(28.2293, -25.7545), (28.2510, -25.7310), (28.2050, -25.7800)];

const CATEGORIES: [Category; 6] = [
    Category::Theft,
    Category::Vandalism,
    Category::Harassment,
    Category::SuspiciousActivity,
    Category::Fire,
    Category::Other,
];

fn jitter(base: f64) -> f64 {
    // Roughly +-500m at these latitudes.
    base + (fastrand::f64() - 0.5) * 0.009
}

pub struct ReportSeeder;

#[async_trait::async_trait]
impl Seeder for ReportSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let campuses = campus::Entity::find()
            .all(db)
            .await
            .expect("Failed to load campuses");

        for (i, campus) in campuses.iter().enumerate() {
            let (lon, lat) = CENTRES[i % CENTRES.len()];

            let students = user::Entity::find()
                .filter(user::Column::CampusId.eq(campus.id))
                .filter(user::Column::Role.eq(user::Role::Student))
                .all(db)
                .await
                .expect("Failed to load students");
            let moderator = user::Entity::find()
                .filter(user::Column::CampusId.eq(campus.id))
                .filter(user::Column::Role.eq(user::Role::Moderator))
                .one(db)
                .await
                .expect("Failed to load moderator");

            for n in 0..15 {
                let reporter = &students[fastrand::usize(..students.len())];
                let new = NewReport {
                    reporter_id: reporter.id,
                    campus_id: campus.id,
                    category: CATEGORIES[fastrand::usize(..CATEGORIES.len())],
                    severity: fastrand::i32(1..=5),
                    title: Sentence(3..8).fake(),
                    description: Sentence(8..20).fake(),
                    longitude: jitter(lon),
                    latitude: jitter(lat),
                    media_urls: vec![],
                    is_anonymous: fastrand::u8(..4) == 0,
                };
                let report = Model::create(db, new).await.expect("Failed to seed report");

                // A few community votes on each report.
                for voter in students.iter().take(fastrand::usize(..4)) {
                    if voter.id == report.reporter_id {
                        continue;
                    }
                    let vote = if fastrand::bool() { VoteType::Confirm } else { VoteType::Dispute };
                    let _ = Model::add_vote(db, report.id, voter.id, vote).await;
                }

                if fastrand::bool() {
                    let commenter = &students[fastrand::usize(..students.len())];
                    let _ = comment::Model::create(
                        db,
                        report.id,
                        commenter.id,
                        "I saw this too, can confirm.",
                        false,
                    )
                    .await;
                }

                // Walk a third of the queue through moderation so the
                // dashboard shows every status.
                if let Some(moderator) = &moderator {
                    match n % 6 {
                        0 => {
                            let _ = moderation::verify(db, moderator, report.id, None).await;
                        }
                        1 => {
                            let _ = moderation::reject(db, moderator, report.id, None).await;
                        }
                        2 => {
                            let _ = moderation::resolve(db, moderator, report.id, Some("Handled by campus security.")).await;
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
