//! Prediction API Handlers
//!
//! `POST /predict` runs a forecast and remembers it; `GET /prediction`
//! returns the remembered record.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Json,
};
use common::{AppError, BODY_TOO_LARGE_MESSAGE};
use freshpoint_forecast::Prediction;
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::dto::parse_predict_body;
use crate::error::PredSrvError;
use crate::storage::StoredPrediction;

pub const NO_PREDICTION_MESSAGE: &str = "No prediction has been made yet. POST /predict first.";

/// Forecast a sample set
///
/// Body is either a bare array of `{timestamp, value}` or an object
/// `{params, data}`. The response is the prediction itself, history first.
///
/// @route POST /predict
/// @input Bytes - JSON body, bare `Sample[]` or `{params?, data}`
/// @output Json<Prediction> - Fitted history followed by the weekly forecast
/// @status 400 - Malformed body, wrong item types or unparseable timestamps
/// @side-effects Replaces the stored last prediction
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/predict",
    tag = "prediction",
    request_body = crate::dto::PredictPayload,
    responses(
        (status = 200, description = "Prediction computed", body = Prediction,
            example = json!({
                "data": [
                    {"timestamp": "2024-01-01T00:00:00Z", "value": 10},
                    {"timestamp": "2024-01-08T00:00:00Z", "value": 13},
                    {"timestamp": "2024-01-15T00:00:00.000Z", "value": 16}
                ]
            })
        ),
        (status = 400, description = "Invalid request body", body = common::ErrorResponse),
        (status = 413, description = "Request body too large", body = common::ErrorResponse),
        (status = 500, description = "Prediction failed", body = common::ErrorResponse)
    )
))]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Prediction>, AppError> {
    let body = body.map_err(body_rejection)?;
    let request = parse_predict_body(&body)?;
    debug!(
        samples = request.samples().len(),
        params = request.params().map_or(0, <[_]>::len),
        "Predict request"
    );

    let prediction = state
        .forecaster
        .predict(request.params(), request.samples())
        .map_err(PredSrvError::from)?;

    state
        .store
        .set(StoredPrediction::new(request.raw_params, prediction.clone()))
        .await?;

    info!(
        samples = request.payload.data.len(),
        points = prediction.len(),
        "Prediction stored"
    );

    Ok(Json(prediction))
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(BODY_TOO_LARGE_MESSAGE)
    } else {
        AppError::bad_request(rejection.body_text())
    }
}

/// Return the last stored prediction
///
/// @route GET /prediction
/// @output Json<StoredPrediction> - `{timestamp, params, predResult}`
/// @status 404 - No prediction has been made yet
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/prediction",
    tag = "prediction",
    responses(
        (status = 200, description = "Last prediction", body = StoredPrediction),
        (status = 404, description = "No prediction yet", body = common::ErrorResponse)
    )
))]
pub async fn last_prediction(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoredPrediction>, AppError> {
    match state.store.get().await? {
        Some(record) => Ok(Json(record)),
        None => Err(PredSrvError::not_found(NO_PREDICTION_MESSAGE).into()),
    }
}
