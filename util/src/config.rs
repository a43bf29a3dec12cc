//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. Moderation
//! policy constants (edit window, spam threshold, nearby radius bounds) live here
//! so the db core and the API layer agree on them.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Runtime configuration loaded from `.env` / environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Minutes after creation during which the reporter may still edit.
    pub report_edit_window_minutes: i64,
    /// Distinct spam flags required to auto-transition a report to spam.
    pub spam_report_threshold: usize,
    /// Nearby query radius bounds, in meters, enforced at the API boundary.
    pub nearby_radius_min_m: f64,
    pub nearby_radius_max_m: f64,
    /// Reports at or above this severity trigger a campus-wide notification.
    pub min_severity_for_push: i32,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Panics if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "campus-watch".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").expect("DATABASE_PATH is required"),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET is required"),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or("60".into())
                .parse()
                .unwrap(),
            report_edit_window_minutes: env::var("REPORT_EDIT_WINDOW_MINUTES")
                .unwrap_or("30".into())
                .parse()
                .unwrap(),
            spam_report_threshold: env::var("SPAM_REPORT_THRESHOLD")
                .unwrap_or("5".into())
                .parse()
                .unwrap(),
            nearby_radius_min_m: env::var("NEARBY_RADIUS_MIN_M")
                .unwrap_or("100".into())
                .parse()
                .unwrap(),
            nearby_radius_max_m: env::var("NEARBY_RADIUS_MAX_M")
                .unwrap_or("10000".into())
                .parse()
                .unwrap(),
            min_severity_for_push: env::var("MIN_SEVERITY_FOR_PUSH")
                .unwrap_or("4".into())
                .parse()
                .unwrap(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from environment variables. Useful in tests.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters, used by tests and runtime overrides ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_report_edit_window_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.report_edit_window_minutes = value);
    }

    pub fn set_spam_report_threshold(value: usize) {
        AppConfig::set_field(|cfg| cfg.spam_report_threshold = value);
    }

    pub fn set_min_severity_for_push(value: i32) {
        AppConfig::set_field(|cfg| cfg.min_severity_for_push = value);
    }
}

// --- Free accessors, the form most call sites use ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn report_edit_window_minutes() -> i64 {
    AppConfig::global().report_edit_window_minutes
}

pub fn spam_report_threshold() -> usize {
    AppConfig::global().spam_report_threshold
}

pub fn nearby_radius_min_m() -> f64 {
    AppConfig::global().nearby_radius_min_m
}

pub fn nearby_radius_max_m() -> f64 {
    AppConfig::global().nearby_radius_max_m
}

pub fn min_severity_for_push() -> i32 {
    AppConfig::global().min_severity_for_push
}
