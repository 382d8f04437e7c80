pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use std::time::Duration;

/// Turn a configured path or DSN into a connection URL.
///
/// DSNs (`sqlite:`, `postgres://`, `mysql://`) pass through untouched; anything else
/// is treated as a SQLite file path whose parent directory is created on demand.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        return path_or_url.to_string();
    }

    // SQLite won't create intermediate dirs.
    if let Some(parent) = Path::new(path_or_url).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}

/// Open the shared connection pool for `path_or_url`.
pub async fn connect(path_or_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url(path_or_url));
    opts.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    tracing::info!(target: "db", "Connected to database");
    Ok(db)
}
