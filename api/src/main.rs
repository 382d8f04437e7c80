use api::{build_app, state::AppState};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use services::AttendancePolicy;
use std::{net::SocketAddr, process::ExitCode};
use tracing::{error, info};
use tracing_appender::rolling;
use util::{config::AppConfig, ws::WebSocketManager};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = AppConfig::global().clone();
    let _log_guard = init_logging(&cfg.log_file, &cfg.log_level, cfg.log_to_stdout);

    if cfg.jwt_secret.trim().is_empty() {
        error!("JWT_SECRET is not set; refusing to start");
        eprintln!("JWT_SECRET must be set");
        return ExitCode::FAILURE;
    }

    let db = match db::connect(&cfg.database_path).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = %cfg.database_path, "Failed to open database");
            eprintln!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        error!(error = %e, "Failed to apply migrations");
        eprintln!("Failed to apply migrations: {e}");
        return ExitCode::FAILURE;
    }

    let policy = AttendancePolicy::from_config(&cfg);
    info!(
        store_timeout_ms = policy.store_timeout.as_millis() as u64,
        default_slot_id = ?policy.default_slot_id,
        geofence = policy.geofence.is_some(),
        "Attendance policy loaded"
    );

    let app_state = AppState::new(db.clone(), WebSocketManager::new(), policy);
    let app = build_app(app_state);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            eprintln!("Failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Starting {} on http://{}", cfg.project_name, addr);
    info!(%addr, env = %cfg.env, "Server listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Err(e) = db.close().await {
        error!(error = %e, "Failed to close database cleanly");
    }

    match served {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server crashed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}

fn init_logging(
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info,services=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
