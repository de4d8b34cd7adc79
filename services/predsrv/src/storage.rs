//! Last-prediction storage
//!
//! Holds the most recent successful prediction for `GET /prediction`.
//! Memory only; the record is gone on restart.

use async_trait::async_trait;
use freshpoint_forecast::Prediction;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::Result;

/// Record kept for the last successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StoredPrediction {
    /// Time the prediction was made (RFC 3339, UTC, millisecond precision)
    pub timestamp: String,
    /// Parameters echoed from the request, `[]` when none were sent
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub params: serde_json::Value,
    #[serde(rename = "predResult")]
    pub prediction: Prediction,
}

impl StoredPrediction {
    pub fn new(params: serde_json::Value, prediction: Prediction) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            params,
            prediction,
        }
    }
}

/// Storage backend for the last prediction
///
/// Writes replace the previous record; the last writer wins.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn get(&self) -> Result<Option<StoredPrediction>>;

    async fn set(&self, record: StoredPrediction) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryPredictionStore {
    last: RwLock<Option<StoredPrediction>>,
}

impl MemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionStore for MemoryPredictionStore {
    async fn get(&self) -> Result<Option<StoredPrediction>> {
        Ok(self.last.read().await.clone())
    }

    async fn set(&self, record: StoredPrediction) -> Result<()> {
        *self.last.write().await = Some(record);
        Ok(())
    }
}
