use rand::Rng;
use sea_orm::DbConn;

use crate::models::campus::Model as Campus;

/// Inserts a campus with a random name and returns it.
pub async fn make(db: &DbConn) -> Campus {
    let n: u32 = rand::thread_rng().gen_range(0..100_000);
    Campus::create(db, &format!("Campus {n}"))
        .await
        .expect("Failed to create campus")
}
