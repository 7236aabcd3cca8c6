//! Atelier HTTP server
//!
//! Serves the public site routes: the landing page with its contact form,
//! the project listing, and the research listing. Handlers gather data
//! through the core page assemblers and hand a named template plus a
//! value mapping to the page delivery boundary; HTML rendering itself is
//! an external concern.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use atelier_core::config::Config;
use atelier_core::mail::SmtpMailer;
use atelier_core::storage::{Database, DatabaseConfig};

pub mod error;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod state;

use state::AppState;

/// Initialize logging, open the record store, and serve until shutdown
pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load().context("Failed to load configuration")?;

    info!("Initializing record store...");
    let db_config = match &config.database.path {
        Some(path) => DatabaseConfig::with_path(path),
        None => DatabaseConfig::default(),
    };
    let db = Database::new(db_config).await?;

    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);
    let state = AppState::new(db, mailer, Arc::new(config));

    let app = routes::create_router(state.clone());

    let address = format!("{}:{}", state.config.server.bind, state.config.server.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
