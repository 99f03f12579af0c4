//! Account Server: credential issuance and session lifecycle over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use account_api::{AppState, build_app};
use account_auth::SessionService;
use account_core::config::{AppConfig, DatabaseProvider, LogFormat};
use account_core::error::{AppError, ErrorKind};
use account_database::{
    CredentialStore, DatabasePool, MemoryCredentialStore, PostgresCredentialStore,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("ACCOUNT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Install the process-wide tracing subscriber. Nothing else does.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting account server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Credential store ─────────────────────────────────
    let (store, pool) = build_store(&config).await?;

    // ── Step 2: Session service ──────────────────────────────────
    let sessions = SessionService::new(store, &config.auth)?;

    // ── Step 3: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_address();
    let app = build_app(AppState::new(config, sessions));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!(address = %addr, "Account server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Account server stopped");
    Ok(())
}

/// Select the credential store backend. The pool is returned so it can be
/// closed on shutdown.
async fn build_store(
    config: &AppConfig,
) -> Result<(Arc<dyn CredentialStore>, Option<DatabasePool>), AppError> {
    match config.database.provider {
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory credential store; all data is lost on restart");
            let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
            Ok((store, None))
        }
        DatabaseProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                account_database::migration::run_migrations(pool.pool()).await?;
            }

            let store: Arc<dyn CredentialStore> =
                Arc::new(PostgresCredentialStore::new(pool.pool().clone()));
            Ok((store, Some(pool)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
