//! Subhub - Entry Point
//!
//! Starts the subscription server with graceful shutdown support.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subhub::api::ApiServer;
use subhub::config::{Config, LogConfig};
use subhub::database::Database;
use subhub::error::{Result, SubhubError};
use subhub::repository::{LinkStore, PostgresLinkStore, StaticLinkStore};
use subhub::subscription::SubscriptionService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log);

    info!("Starting Subhub");

    // Link store: PostgreSQL when configured, static links otherwise
    let db = match &config.database {
        Some(db_config) => {
            let db = Database::new(db_config).await?;
            info!("Connected to database");
            db.run_migrations().await?;
            info!("Database migrations complete");
            Some(db)
        }
        None => None,
    };

    let store: Arc<dyn LinkStore> = match &db {
        Some(db) => Arc::new(PostgresLinkStore::new(db)),
        None => Arc::new(StaticLinkStore::load(&config.links).await?),
    };
    info!("Using {} link store", store.store_name());

    // One connection pool shared by source fetches and conversion calls
    let client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .build()?;

    let service = SubscriptionService::new(store, client, &config);
    let api_server = ApiServer::new(service, config.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut server_task = tokio::spawn(async move { api_server.run(shutdown_rx).await });

    info!("Server started on {}", config.server_addr());

    let finished = tokio::select! {
        outcome = &mut server_task => Some(outcome),
        _ = shutdown_signal() => None,
    };

    let outcome = match finished {
        Some(outcome) => outcome,
        None => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
            server_task.await
        }
    };

    if let Some(db) = db {
        db.close().await;
    }

    match outcome {
        Ok(Ok(())) => {
            info!("Subhub stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Server error: {}", e);
            Err(e)
        }
        Err(e) => Err(SubhubError::Internal(format!("Server task failed: {}", e))),
    }
}

/// Initialize tracing from `RUST_LOG`, falling back to the configured level
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("subhub={},tower_http=debug", log.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if log.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
