//! Gatehouse Server: token lifecycle authentication service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use gatehouse_api::state::AppState;
use gatehouse_auth::{PasswordHasher, SessionCleanup};
use gatehouse_core::config::AppConfig;
use gatehouse_core::AppResult;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::traits::SystemClock;

/// Gatehouse authentication server.
#[derive(Debug, Parser)]
#[command(name = "gatehouse-server", version, about)]
struct Cli {
    /// Configuration overlay to load from `config/<ENV>.toml`.
    #[arg(long, env = "GATEHOUSE_ENV", default_value = "development")]
    env: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print an Argon2id hash for seeding `auth.users`.
    HashPassword {
        /// Plaintext password to hash.
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::HashPassword { password } => hash_password(&config, &password),
        Command::Serve => {
            init_logging(&config);
            let result = run(config).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Server error");
            }
            result
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Hashes a password with the configured Argon2 parameters.
fn hash_password(config: &AppConfig, password: &str) -> AppResult<()> {
    let hasher = PasswordHasher::new(&config.auth.argon2)?;
    println!("{}", hasher.hash_password(password)?);
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Gatehouse");

    config.validate()?;

    let state = AppState::new(config.clone(), Arc::new(SystemClock))?;
    tracing::info!(
        users = state.credential_store.len(),
        rotate_refresh = config.auth.rotate_refresh,
        "Authentication system initialized"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_handle = if config.session.cleanup_enabled {
        let cleanup = SessionCleanup::new(Arc::clone(&state.session_manager), &config.session);
        Some(tokio::spawn(async move {
            cleanup.run(shutdown_rx).await;
        }))
    } else {
        tracing::info!("Session cleanup disabled");
        None
    };

    let app = gatehouse_api::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}: {e}"), e)
        })?;

    tracing::info!(addr = %addr, "Gatehouse server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = cleanup_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        let _ = tokio::time::timeout(grace, handle).await;
    }

    tracing::info!("Gatehouse server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
