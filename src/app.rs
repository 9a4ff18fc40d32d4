//! Application assembly: config, database pool, router, shutdown.

use crate::config::Config;
use crate::state::AppState;
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::ConnectOptions;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub async fn new() -> Result<Self> {
        let config = Config::from_env()?;

        let connect_options = sqlx::postgres::PgConnectOptions::from_str(&config.database_url)
            .context("Failed to parse database URL")?
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(4))
            .idle_timeout(Duration::from_secs(60 * 2))
            .max_lifetime(Duration::from_secs(60 * 30))
            .connect_with(connect_options)
            .await
            .context("Failed to create database pool")?;

        info!(
            max_connections = 4,
            acquire_timeout = "4s",
            idle_timeout = "2m",
            max_lifetime = "30m",
            "database pool established"
        );

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("database migrations completed");

        let app_state = AppState::new(db_pool, &config);
        info!(
            catalog_ttl = fmt_duration(config.catalog_ttl()),
            browse_ttl = fmt_duration(config.browse_ttl()),
            "catalog caches initialized"
        );

        Ok(App { config, app_state })
    }

    /// Serve the API until SIGINT/SIGTERM, then drain connections.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(%addr, "web server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(self.config.shutdown_timeout()))
            .await
            .context("web server exited with error")?;

        info!("web server shut down cleanly");
        Ok(())
    }
}

/// Resolve when a shutdown signal arrives, arming a drain watchdog.
///
/// If connections have not drained within `drain_limit`, the process exits
/// anyway so a stuck handler cannot block deploys.
async fn shutdown_signal(drain_limit: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        drain_limit = fmt_duration(drain_limit),
        "shutdown signal received, draining connections"
    );

    tokio::spawn(async move {
        tokio::time::sleep(drain_limit).await;
        warn!("drain limit exceeded, exiting");
        std::process::exit(1);
    });
}
