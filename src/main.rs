use anyhow::{Context, Result};
use timesheet_bridge::api::{create_router, AppState};
use timesheet_bridge::config::BridgeConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timesheet_bridge=info,timesheet_connector=info".into()),
        )
        .init();

    info!("Timesheet bridge starting...");

    let config = BridgeConfig::from_env().context("Failed to load configuration")?;
    let connector_config = config
        .connector_config()
        .context("Invalid connector configuration")?;

    if connector_config.client_id.is_empty() {
        tracing::warn!("TIMESHEET_CLIENT_ID is not set, OAuth code exchange will fail");
    }

    info!(
        bind_addr = %config.server.bind_addr,
        base_url = %connector_config.base_url,
        timezone = %connector_config.timezone,
        week_start = ?connector_config.week_start,
        "Configuration loaded"
    );

    let state = AppState::new(connector_config).context("Failed to initialize HTTP client")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    info!(bind_addr = %config.server.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Timesheet bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl_c signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
