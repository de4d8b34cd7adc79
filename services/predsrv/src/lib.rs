//! predsrv library exports for testing

pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod storage;

// Re-export commonly used types
pub use app_state::AppState;
pub use config::PredsrvConfig;
pub use error::{PredSrvError, Result};
pub use routes::create_routes;
pub use storage::{MemoryPredictionStore, PredictionStore, StoredPrediction};
