use crate::seed::Seeder;
use db::models::campus::Model;
use sea_orm::DatabaseConnection;

pub struct CampusSeeder;

#[async_trait::async_trait]
impl Seeder for CampusSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        for name in ["Main Campus", "North Campus", "Medical Campus"] {
            Model::create(db, name)
                .await
                .expect("Failed to seed campus");
        }
    }
}
