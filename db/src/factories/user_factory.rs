use rand::Rng;
use sea_orm::DbConn;

use crate::models::user::{Model as User, Role};

/// Inserts a user with the given role into the campus and returns them.
pub async fn make(db: &DbConn, role: Role, campus_id: i64) -> User {
    let n: u32 = rand::thread_rng().gen_range(0..100_000_000);
    User::create(
        db,
        &format!("user{n}"),
        &format!("user{n}@example.edu"),
        "password123",
        role,
        campus_id,
    )
    .await
    .expect("Failed to create user")
}
