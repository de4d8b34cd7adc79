//! Health Check API Handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, response::Json};
use common::{AppError, ComponentHealth, HealthStatus, ServiceStatus};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::app_state::AppState;

pub const LIVENESS_MESSAGE: &str = "FreshPoint API is running";

/// Liveness payload for `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Liveness {
    pub status: String,
    pub message: String,
}

/// Liveness probe
///
/// @route GET /
/// @output Json<Liveness> - `{"status": "ok", "message": "FreshPoint API is running"}`
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is running", body = Liveness))
))]
pub async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok".to_string(),
        message: LIVENESS_MESSAGE.to_string(),
    })
}

/// Health check endpoint
///
/// Reports uptime and whether a prediction is cached.
///
/// @route GET /health
/// @output Json<HealthStatus> - Service health metrics
/// @side-effects None (read-only operation)
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = common::HealthStatus))
))]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthStatus>, AppError> {
    let cached = state.store.get().await?.is_some();
    let defaults = state.forecaster.defaults();

    let mut checks = HashMap::new();
    checks.insert(
        "prediction_store".to_string(),
        ComponentHealth::healthy(if cached {
            "prediction cached"
        } else {
            "no prediction yet"
        }),
    );
    checks.insert(
        "forecaster".to_string(),
        ComponentHealth::healthy(format!(
            "ema_alpha={} future_weeks={}",
            defaults.ema_alpha, defaults.future_weeks
        )),
    );

    Ok(Json(HealthStatus {
        status: ServiceStatus::Healthy,
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
    }))
}
