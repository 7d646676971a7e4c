use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dbadmin_driver_postgres::PostgresConnection;
use dbadmin_server::{Cli, ServerConfig, logging, router};
use dbadmin_services::DataService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;
    logging::init(config.logging_config())?;

    let connection = PostgresConnection::from_connection_string(
        config.database_url()?,
        &config.tls_settings()?,
        config.schema.clone(),
    )
    .context("Failed to configure the database connection")?;

    let mut service = DataService::new(Arc::new(connection));
    if let Some(data_dir) = &config.data_dir {
        service = service.with_data_dir(data_dir);
    }

    if service.ping().await.is_err() {
        tracing::error!("Failed to connect to the database");
        std::process::exit(1);
    }

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    tracing::info!(listen = %config.listen, schema = %config.schema, "dbadmin listening");

    axum::serve(listener, router(Arc::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dbadmin stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
