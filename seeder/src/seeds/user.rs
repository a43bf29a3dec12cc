use crate::seed::Seeder;
use db::models::campus;
use db::models::user::{Model, Role};
use fake::{Fake, faker::internet::en::SafeEmail};
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct UserSeeder;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let campuses = campus::Entity::find()
            .all(db)
            .await
            .expect("Failed to load campuses");
        let home = campuses.first().expect("No campuses seeded").id;

        // Fixed accounts, one per role, for manual testing.
        let _ = Model::create(db, "admin", "admin@example.edu", "password123", Role::SuperAdmin, home).await;
        let _ = Model::create(db, "campus_admin", "campus_admin@example.edu", "password123", Role::Admin, home).await;
        let _ = Model::create(db, "moderator", "moderator@example.edu", "password123", Role::Moderator, home).await;
        let _ = Model::create(db, "security", "security@example.edu", "password123", Role::Security, home).await;
        let _ = Model::create(db, "student", "student@example.edu", "password123", Role::Student, home).await;

        // A moderator per remaining campus so every queue has someone.
        for campus in campuses.iter().skip(1) {
            let username = format!("moderator_{}", campus.id);
            let email: String = SafeEmail().fake();
            let _ = Model::create(db, &username, &email, "password123", Role::Moderator, campus.id).await;
        }

        // Random students spread across campuses.
        for campus in &campuses {
            for _ in 0..8 {
                let username = format!("s{:08}", fastrand::u32(..100_000_000));
                let email: String = SafeEmail().fake();
                let _ = Model::create(db, &username, &email, "password123", Role::Student, campus.id).await;
            }
        }
    }
}
