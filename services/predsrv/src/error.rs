//! Error types for the forecast service

use axum::response::{IntoResponse, Response};
use common::AppError;
use freshpoint_forecast::ForecastError;
use thiserror::Error;
use tracing::error;

/// Message returned for every 5xx so internals never leak to clients
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error while predicting";

pub type Result<T> = std::result::Result<T, PredSrvError>;

#[derive(Error, Debug)]
pub enum PredSrvError {
    /// Request body failed validation
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PredSrvError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure pinned to a JSON path such as `data[2].value`
    pub fn invalid_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<PredSrvError> for AppError {
    fn from(err: PredSrvError) -> Self {
        match err {
            PredSrvError::Validation { message, field } => {
                let app = AppError::bad_request(message.clone());
                match field {
                    Some(field) => app.with_field_error(field, message),
                    None => app,
                }
            },
            PredSrvError::NotFound(message) => AppError::not_found(message),
            PredSrvError::Forecast(e) if e.is_input_error() => AppError::bad_request(e.to_string()),
            other => {
                error!("Prediction request failed: {}", other);
                AppError::internal_error(INTERNAL_ERROR_MESSAGE)
            },
        }
    }
}

impl IntoResponse for PredSrvError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
