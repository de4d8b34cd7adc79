//! API Route Configuration
//!
//! Central route definition for all forecast service endpoints

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use common::RequestBodyLimit;
use tower_http::cors::CorsLayer;

#[cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::api::health_handlers::{health_check, liveness};
use crate::api::predict_handlers::{last_prediction, predict};
use crate::app_state::AppState;

// OpenAPI documentation - only compiled when openapi feature is enabled
#[cfg(feature = "openapi")]
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health_handlers::liveness,
        crate::api::health_handlers::health_check,
        crate::api::predict_handlers::predict,
        crate::api::predict_handlers::last_prediction
    ),
    components(
        schemas(
            crate::dto::PredictPayload,
            crate::storage::StoredPrediction,
            crate::api::health_handlers::Liveness,
            freshpoint_forecast::Sample,
            freshpoint_forecast::Parameter,
            freshpoint_forecast::ParamValue,
            freshpoint_forecast::Prediction,
            freshpoint_forecast::PredictedPoint,
            common::ErrorResponse,
            common::ErrorInfo,
            common::HealthStatus,
            common::ServiceStatus,
            common::ComponentHealth
        )
    ),
    tags(
        (name = "prediction", description = "Sales forecast"),
        (name = "health", description = "Service health")
    )
)]
pub struct PredsrvApiDoc;

#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(PredsrvApiDoc::openapi())
}

/// Create all API routes for the forecast service
pub fn create_routes(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let router = Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/predict/", post(predict))
        .route("/prediction", get(last_prediction))
        .route("/prediction/", get(last_prediction));

    #[cfg(feature = "openapi")]
    let router = router.route("/api-docs/openapi.json", get(openapi_json));

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        // Apply HTTP request logging middleware
        .layer(axum::middleware::from_fn_with_state(
            RequestBodyLimit(max_body_bytes),
            common::logging::http_request_logger,
        ))
        .with_state(state)
}
