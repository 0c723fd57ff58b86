use anyhow::{Context, Result};
use grid_load_forecaster::{api, config::Config, service::AppState, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let app_state = AppState::new(cfg.clone()).context("failed to initialise application state")?;

    let app = api::router(app_state);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be reachable from the network");
    }

    info!(
        %addr,
        transformers = cfg.transformers.len(),
        peak_alert_threshold_mw = cfg.forecast.peak_alert_threshold_mw,
        "starting grid load forecaster"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
