use sea_orm::DbConn;

use crate::models::report::{Category, Model as Report, NewReport};

/// A valid report payload at the given coordinates; tweak fields before
/// passing it to `Report::create` when a test needs something specific.
pub fn new_report(reporter_id: i64, campus_id: i64, longitude: f64, latitude: f64) -> NewReport {
    NewReport {
        reporter_id,
        campus_id,
        category: Category::Theft,
        severity: 3,
        title: "Stolen bicycle near the library".into(),
        description: "A locked bicycle was taken from the rack outside the main library.".into(),
        longitude,
        latitude,
        media_urls: vec![],
        is_anonymous: false,
    }
}

/// Inserts a report at the given coordinates and returns it.
pub async fn make(db: &DbConn, reporter_id: i64, campus_id: i64, lon: f64, lat: f64) -> Report {
    Report::create(db, new_report(reporter_id, campus_id, lon, lat))
        .await
        .expect("Failed to create report")
}
