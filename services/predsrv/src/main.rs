//! FreshPoint forecast service (`predsrv`)
//!
//! HTTP front end for the EMA + linear trend sales forecaster.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use common::shutdown::wait_for_shutdown;
use freshpoint_forecast::Forecaster;
use predsrv::bootstrap::{self, Args};
use predsrv::{create_routes, AppState, MemoryPredictionStore, PredsrvConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config =
        PredsrvConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let service_info = bootstrap::service_info(&config);

    bootstrap::initialize_logging(&service_info, &config.logging)?;
    if !args.no_banner {
        common::service_bootstrap::print_startup_banner(&service_info);
    }

    // Validation mode: validate and exit
    if args.validate {
        info!(
            "Configuration valid: service={} ema_alpha={} future_weeks={}",
            config.service.name, config.forecast.ema_alpha, config.forecast.future_weeks
        );
        return Ok(());
    }

    let bind_address =
        bootstrap::determine_bind_address(args.bind_address.clone(), &config, &service_info);
    let addr: SocketAddr = bind_address
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind_address))?;

    let state = Arc::new(AppState::new(
        Forecaster::new(config.forecast),
        Arc::new(MemoryPredictionStore::new()),
        config.service.name.clone(),
    ));
    let app = create_routes(state, config.service.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("API server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            wait_for_shutdown().await;
        })
        .await
        .context("server error")?;

    info!("{} stopped", service_info.name);
    Ok(())
}
