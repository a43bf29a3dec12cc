use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Connects to a fresh in-memory SQLite database with all migrations applied.
///
/// Also seeds the environment variables `AppConfig` requires, so tests can
/// touch policy constants without a `.env` file.
pub async fn setup_test_db() -> DatabaseConnection {
    // SAFETY: test-only env seeding, values are constant across the process.
    unsafe {
        if std::env::var("DATABASE_PATH").is_err() {
            std::env::set_var("DATABASE_PATH", ":memory:");
        }
        if std::env::var("JWT_SECRET").is_err() {
            std::env::set_var("JWT_SECRET", "test-secret");
        }
    }

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
