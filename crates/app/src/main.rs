mod auth;
mod departments;
mod employees;
mod extract;
mod problem;
mod router;
mod services;
mod telemetry;
#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc};

use tracing::{info, warn};

use hr_records_storage::Database;
use hr_records_util::{load_env_file, AppConfig};

use crate::auth::StaticCredentialStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let database = Database::connect(&config.database_url).await?;
    database.run_migrations().await?;
    info!(stage = "app", database_url = %config.database_url, "database ready");

    if !config.environment.is_development() && config.uses_default_admin_password() {
        warn!(stage = "app", env = %config.environment.as_str(), "default admin password in use");
    }
    let credentials = Arc::new(StaticCredentialStore::from_config(&config));

    let state = router::AppState::new(metrics, database, credentials, config.environment);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(stage = "app", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(stage = "app", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(stage = "app", "shutdown signal received");
}
