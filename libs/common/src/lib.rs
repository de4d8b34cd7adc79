//! FreshPoint basic library
//!
//! Provides basic functions shared by all services, including:
//! - API error envelope and health models
//! - logging functions
//! - graceful shutdown and bootstrap helpers

pub mod api_types;
pub mod logging;
pub mod serde_helpers;
pub mod service_bootstrap;
pub mod shutdown;

// Re-export commonly used API types
pub use api_types::{
    ComponentHealth, ErrorInfo, ErrorResponse, HealthStatus, ServiceStatus, BODY_TOO_LARGE_MESSAGE,
};

// Re-export AppError when axum feature is enabled
#[cfg(feature = "axum")]
pub use api_types::AppError;

pub use logging::LogConfig;
#[cfg(feature = "axum")]
pub use logging::RequestBodyLimit;
pub use service_bootstrap::ServiceInfo;

// Re-export common dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;
