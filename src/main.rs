use std::sync::Arc;

use aid_tracker::api;
use aid_tracker::config::Config;
use aid_tracker::error::AppError;
use aid_tracker::ledger::access::AccessControl;
use aid_tracker::ledger::executor::run_ledger;
use aid_tracker::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let access = AccessControl::new(config.org_address.clone(), config.field_address.clone())?;
    let (app_state, tx_rx) = AppState::new(access, config.tx_queue_size, config.event_buffer_size);
    let shared_state = Arc::new(app_state);

    tokio::spawn(run_ledger(shared_state.clone(), tx_rx));

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        org = %config.org_address,
        field = %config.field_address,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    tracing::info!("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
