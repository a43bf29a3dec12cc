use crate::seed::Seeder;
use crate::seed::run_seeder;
use crate::seeds::{campus::CampusSeeder, report::ReportSeeder, user::UserSeeder};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    // Seed into a clean schema.
    Migrator::fresh(&db).await.expect("Failed to run migrations");

    for (seeder, name) in [
        (Box::new(CampusSeeder) as Box<dyn Seeder + Send + Sync>, "Campus"),
        (Box::new(UserSeeder), "User"),
        (Box::new(ReportSeeder), "Report"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
