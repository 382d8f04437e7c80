//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Long-lived services (the attendance manager, the slot registry) should be handed
//! the values they need at construction time rather than reading the global directly.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Represents the complete application configuration loaded from environment variables.
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
    /// Upper bound for a single store round-trip made by the attendance manager.
    pub store_timeout_ms: u64,
    /// Slot used when a check-in request names none. `None` means a slot is required.
    pub default_slot_id: Option<i64>,
    pub geofence_enabled: bool,
    pub library_lat: f64,
    pub library_lng: f64,
    pub geofence_radius_meters: f64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing or malformed optional values fall back to their defaults. An empty
    /// `JWT_SECRET` is allowed here; the server binary refuses to start without one.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "libraflow".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: flag("LOG_TO_STDOUT"),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/libraflow.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: var_or("PORT", 3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_duration_minutes: var_or("JWT_DURATION_MINUTES", 60),
            store_timeout_ms: var_or("STORE_TIMEOUT_MS", 5_000),
            default_slot_id: env::var("DEFAULT_SLOT_ID")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            geofence_enabled: flag("GEOFENCE_ENABLED"),
            library_lat: var_or("LIBRARY_LAT", 28.6129),
            library_lng: var_or("LIBRARY_LNG", 77.2295),
            geofence_radius_meters: var_or("GEOFENCE_RADIUS_METERS", 100.0),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// A poisoned lock still yields the last written values.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(PoisonError::into_inner);
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }

    pub fn set_store_timeout_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.store_timeout_ms = value);
    }

    pub fn set_default_slot_id(value: Option<i64>) {
        AppConfig::set_field(|cfg| cfg.default_slot_id = value);
    }

    pub fn set_geofence_enabled(value: bool) {
        AppConfig::set_field(|cfg| cfg.geofence_enabled = value);
    }
}

// --- Free accessors, mirroring the field names ---

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
