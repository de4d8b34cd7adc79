//! Application State Management
//!
//! Shared across all API handlers

use std::sync::Arc;
use std::time::Instant;

use freshpoint_forecast::{ForecastDefaults, Forecaster};

use crate::storage::{MemoryPredictionStore, PredictionStore};

/// Application state containing shared resources
pub struct AppState {
    /// Forecaster carrying the configured fallback parameters
    pub forecaster: Forecaster,

    /// Last successful prediction
    pub store: Arc<dyn PredictionStore>,

    /// Service name reported by `/health`
    pub service_name: String,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        forecaster: Forecaster,
        store: Arc<dyn PredictionStore>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            forecaster,
            store,
            service_name: service_name.into(),
            started_at: Instant::now(),
        }
    }

    /// State with an empty in-memory store
    pub fn in_memory(defaults: ForecastDefaults, service_name: impl Into<String>) -> Self {
        Self::new(
            Forecaster::new(defaults),
            Arc::new(MemoryPredictionStore::new()),
            service_name,
        )
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
